//! URL embedding post-pass.
//!
//! A paragraph whose only content is a single anchor whose text equals its
//! `http(s)` href is an embed candidate. Each candidate's page is fetched
//! once; the configured transformers then run in order and the first to
//! produce markup replaces the paragraph. Anything that fails along the way
//! is logged and the paragraph stays a plain link.

use kuchikikiki::NodeRef;
use log::warn;
use markup5ever::{QualName, local_name, ns};
use serde::Deserialize;
use tendril::TendrilSink;
use url::Url;

use crate::{
  error::EmbedError,
  fetch::{Fetcher, Page},
  fragment,
  preset::{EmbedOptions, EmbedTransformer},
};

/// Apply the embedding stage to rendered HTML.
///
/// DOM handles stay inside synchronous sections; only plain data crosses
/// the awaits, keeping the returned future `Send`.
pub(super) async fn apply(
  fetcher: &Fetcher,
  options: &EmbedOptions,
  html: &str,
) -> String {
  let urls = candidate_urls(html);
  if urls.is_empty() {
    return html.to_string();
  }

  let mut replacements = Vec::with_capacity(urls.len());
  for url in &urls {
    replacements.push(resolve(fetcher, options, url).await);
  }

  splice(html, &replacements)
}

/// Candidate URLs in document order.
fn candidate_urls(html: &str) -> Vec<String> {
  let document = parse_body_fragment(html);
  collect_candidates(&document)
    .into_iter()
    .map(|candidate| candidate.url)
    .collect()
}

/// Parse rendered HTML in a body fragment context.
fn parse_body_fragment(html: &str) -> NodeRef {
  kuchikikiki::parse_fragment(
    QualName::new(None, ns!(html), local_name!("body")),
    Vec::new(),
  )
  .one(html)
}

struct Candidate {
  paragraph: NodeRef,
  url:       String,
}

/// Collect embed candidates in document order.
fn collect_candidates(document: &NodeRef) -> Vec<Candidate> {
  let mut candidates = Vec::new();

  let Ok(paragraphs) = document.select("p") else {
    return candidates;
  };

  for paragraph in paragraphs {
    let node = paragraph.as_node().clone();
    if let Some(url) = bare_link_url(&node) {
      candidates.push(Candidate {
        paragraph: node,
        url,
      });
    }
  }

  candidates
}

/// The candidate predicate: exactly one `<a>` child (whitespace-only text
/// siblings allowed), an `http`/`https` href, and link text equal to the
/// href. Autolinked `www.` hosts fail the text check on purpose since their
/// text lacks the inserted scheme.
fn bare_link_url(paragraph: &NodeRef) -> Option<String> {
  let mut anchor: Option<NodeRef> = None;

  for child in paragraph.children() {
    if let Some(text) = child.as_text() {
      if !text.borrow().trim().is_empty() {
        return None;
      }
    } else if let Some(element) = child.as_element() {
      if element.name.local != local_name!("a") || anchor.is_some() {
        return None;
      }
      anchor = Some(child.clone());
    } else {
      return None;
    }
  }

  let anchor = anchor?;
  let href = anchor
    .as_element()?
    .attributes
    .borrow()
    .get(local_name!("href"))
    .map(std::string::ToString::to_string)?;

  if !href.starts_with("http://") && !href.starts_with("https://") {
    return None;
  }
  if anchor.text_contents().trim() != href {
    return None;
  }

  Some(href)
}

/// Resolve one candidate to replacement markup through the transformer
/// chain. `None` leaves the paragraph untouched.
async fn resolve(
  fetcher: &Fetcher,
  options: &EmbedOptions,
  url: &str,
) -> Option<String> {
  let page = match fetcher.page(url).await {
    Ok(page) => page,
    Err(err) => {
      warn!("embed: leaving `{url}` as a plain link: {err}");
      return None;
    },
  };

  let scrape = scrape_page(&page, url);

  for transformer in &options.transformers {
    let replacement = match transformer {
      EmbedTransformer::OEmbed => {
        match oembed_markup(fetcher, scrape.oembed_endpoint.as_ref()).await {
          Ok(markup) => markup,
          Err(err) => {
            warn!("embed: oEmbed failed for `{url}`: {err}");
            None
          },
        }
      },
      EmbedTransformer::LinkCard => scrape.card.as_ref().map(card_markup),
    };

    if let Some(markup) = replacement {
      return Some(markup);
    }
  }

  None
}

/// Everything the transformers need from a fetched page, extracted in one
/// synchronous pass. Non-HTML pages scrape to nothing.
struct PageScrape {
  oembed_endpoint: Option<Url>,
  card:            Option<CardData>,
}

struct CardData {
  href:        String,
  title:       String,
  description: Option<String>,
  image:       Option<String>,
  host:        String,
}

fn scrape_page(page: &Page, href: &str) -> PageScrape {
  if !page.is_html() {
    return PageScrape {
      oembed_endpoint: None,
      card:            None,
    };
  }

  let document = kuchikikiki::parse_html().one(page.body.as_str());

  PageScrape {
    oembed_endpoint: discover_oembed(&document, &page.url),
    card:            Some(scrape_card(&document, page, href)),
  }
}

/// Find the page's oEmbed discovery link and resolve it against the page
/// URL, so relative endpoint hrefs work.
fn discover_oembed(document: &NodeRef, base: &Url) -> Option<Url> {
  let link = document
    .select_first(r#"link[type="application/json+oembed"]"#)
    .ok()?;
  let href = {
    let attributes = link.attributes.borrow();
    attributes
      .get(local_name!("href"))
      .map(std::string::ToString::to_string)?
  };

  match base.join(&href) {
    Ok(endpoint) => Some(endpoint),
    Err(source) => {
      warn!("{}", EmbedError::EndpointUrl {
        href,
        base: base.to_string(),
        source,
      });
      None
    },
  }
}

/// Scrape Open Graph metadata with plain-HTML fallbacks.
fn scrape_card(document: &NodeRef, page: &Page, href: &str) -> CardData {
  let title = meta_content(document, r#"meta[property="og:title"]"#)
    .or_else(|| {
      document
        .select_first("title")
        .ok()
        .map(|node| node.as_node().text_contents().trim().to_string())
        .filter(|text| !text.is_empty())
    })
    .unwrap_or_else(|| href.to_string());

  let description = meta_content(document, r#"meta[property="og:description"]"#)
    .or_else(|| meta_content(document, r#"meta[name="description"]"#));

  CardData {
    href: href.to_string(),
    title,
    description,
    image: meta_content(document, r#"meta[property="og:image"]"#),
    host: page.url.host_str().unwrap_or_default().to_string(),
  }
}

/// Non-empty `content` attribute of the first element matching `selector`.
fn meta_content(document: &NodeRef, selector: &str) -> Option<String> {
  let node = document.select_first(selector).ok()?;
  let attributes = node.attributes.borrow();
  attributes
    .get(local_name!("content"))
    .map(str::trim)
    .filter(|content| !content.is_empty())
    .map(std::string::ToString::to_string)
}

/// The subset of the oEmbed response format the markup builder uses.
/// Unknown fields are ignored.
#[derive(Debug, Clone, Deserialize)]
struct OEmbedPayload {
  #[serde(rename = "type")]
  kind:   String,
  title:  Option<String>,
  html:   Option<String>,
  url:    Option<String>,
  width:  Option<u64>,
  height: Option<u64>,
}

impl OEmbedPayload {
  /// Markup for the payload. `link` and unknown kinds embed nothing so the
  /// next transformer gets a chance.
  fn markup(&self) -> Option<String> {
    match self.kind.as_str() {
      // Provider markup is embedded as-is; it is the whole point of the
      // rich and video kinds.
      "rich" | "video" => {
        let html = self.html.as_deref()?;
        Some(format!(
          r#"<div class="oembed oembed-{}">{html}</div>"#,
          self.kind
        ))
      },
      "photo" => {
        let src = self.url.as_deref()?;
        let mut img = format!(
          r#"<img class="oembed oembed-photo" src="{}""#,
          html_escape::encode_double_quoted_attribute(src)
        );
        if let Some(title) = self.title.as_deref() {
          let alt = html_escape::encode_double_quoted_attribute(title);
          img.push_str(&format!(r#" alt="{alt}""#));
        }
        if let (Some(width), Some(height)) = (self.width, self.height) {
          img.push_str(&format!(r#" width="{width}" height="{height}""#));
        }
        img.push('>');
        Some(img)
      },
      _ => None,
    }
  }
}

/// Fetch the discovered endpoint and build provider markup from its
/// payload.
async fn oembed_markup(
  fetcher: &Fetcher,
  endpoint: Option<&Url>,
) -> Result<Option<String>, EmbedError> {
  let Some(endpoint) = endpoint else {
    return Ok(None);
  };

  let response = fetcher.page(endpoint.as_str()).await?;
  let payload: OEmbedPayload = serde_json::from_str(&response.body)
    .map_err(|source| {
      EmbedError::OEmbedPayload {
        url: endpoint.to_string(),
        source,
      }
    })?;

  Ok(payload.markup())
}

/// Card markup for scraped metadata. Text and attribute values are escaped;
/// only provider oEmbed HTML is embedded verbatim.
fn card_markup(card: &CardData) -> String {
  let mut markup = format!(
    r#"<a class="link-card" href="{}">"#,
    html_escape::encode_double_quoted_attribute(&card.href)
  );

  markup.push_str(&format!(
    r#"<span class="link-card-title">{}</span>"#,
    html_escape::encode_text(&card.title)
  ));

  if let Some(description) = card.description.as_deref() {
    markup.push_str(&format!(
      r#"<span class="link-card-description">{}</span>"#,
      html_escape::encode_text(description)
    ));
  }

  if let Some(image) = card.image.as_deref() {
    markup.push_str(&format!(
      r#"<img class="link-card-image" src="{}" alt="">"#,
      html_escape::encode_double_quoted_attribute(image)
    ));
  }

  markup.push_str(&format!(
    r#"<span class="link-card-host">{}</span>"#,
    html_escape::encode_text(&card.host)
  ));

  markup.push_str("</a>");
  markup
}

/// Replace each candidate paragraph with its resolved markup.
///
/// Candidates are re-collected from a fresh parse; the predicate is
/// deterministic, so positions line up with the resolution order.
fn splice(html: &str, replacements: &[Option<String>]) -> String {
  let document = parse_body_fragment(html);
  let candidates = collect_candidates(&document);

  for (candidate, replacement) in candidates.iter().zip(replacements) {
    let Some(markup) = replacement else {
      continue;
    };

    for node in fragment::nodes(markup) {
      candidate.paragraph.insert_before(node);
    }
    candidate.paragraph.detach();
  }

  serialize_fragment(&document)
}

/// Serialize the synthetic fragment root's children, keeping the output
/// wrapper-free.
fn serialize_fragment(document: &NodeRef) -> String {
  let Some(root) = document.first_child() else {
    return String::new();
  };

  let mut out = Vec::new();
  for child in root.children() {
    child.serialize(&mut out).ok();
  }
  String::from_utf8(out).unwrap_or_default()
}
