#![allow(
  clippy::expect_used,
  clippy::unwrap_used,
  clippy::panic,
  reason = "Fine in tests"
)]

use richmark::{
  EmbedOverrides,
  EmbedTransformer,
  Preset,
  PresetOptions,
  Processor,
  Toggle,
};
use richmark_fixtures::FixtureServer;

const FIXTURES: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/web");

/// Check if HTML output contains all expected substrings.
fn assert_html_contains(html: &str, expected: &[&str]) {
  for &needle in expected {
    assert!(
      html.contains(needle),
      "Expected HTML to contain '{needle}', but it did not.\nFull \
       HTML:\n{html}"
    );
  }
}

async fn blog() -> FixtureServer {
  FixtureServer::start(FIXTURES)
    .await
    .expect("fixture bootstrap")
}

fn page_url(fx: &FixtureServer, path: &str) -> String {
  fx.url("blog.example.com", path).expect("known authority")
}

async fn render_default(md: &str) -> String {
  let processor =
    Processor::new(Preset::default()).expect("processor construction");
  processor.render(md).await
}

#[tokio::test]
async fn test_rich_oembed_replaces_the_link_paragraph() {
  let fx = blog().await;
  let url = page_url(&fx, "/article");

  let html = render_default(&format!("# Post\n\n{url}\n")).await;

  assert_html_contains(&html, &[
    "<h1>Post</h1>",
    r#"<div class="oembed oembed-rich">"#,
    r#"<iframe src="/embed/article" title="An embedded article"></iframe>"#,
  ]);
  assert!(
    !html.contains(&format!(r#"<p><a href="{url}">"#)),
    "Expected the bare-link paragraph to be replaced. Got:\n{html}"
  );
}

#[tokio::test]
async fn test_photo_oembed_renders_an_image() {
  let fx = blog().await;
  let url = page_url(&fx, "/photo");

  let html = render_default(&format!("{url}\n")).await;

  assert_html_contains(&html, &[
    r#"class="oembed oembed-photo""#,
    r#"src="/images/photo.png""#,
    r#"alt="A photo""#,
    r#"width="800""#,
    r#"height="600""#,
  ]);
}

#[tokio::test]
async fn test_page_without_oembed_falls_back_to_a_link_card() {
  let fx = blog().await;
  let url = page_url(&fx, "/plain");

  let html = render_default(&format!("{url}\n")).await;

  assert_html_contains(&html, &[
    r#"class="link-card""#,
    &format!(r#"href="{url}""#),
    r#"<span class="link-card-title">A plain post</span>"#,
    r#"<span class="link-card-description">No oEmbed here, cards only.</span>"#,
    r#"src="/images/cover.png""#,
    r#"<span class="link-card-host">127.0.0.1</span>"#,
  ]);
}

#[tokio::test]
async fn test_link_kind_payload_falls_through_to_the_card() {
  let fx = blog().await;
  let url = page_url(&fx, "/linkonly");

  let html = render_default(&format!("{url}\n")).await;

  assert!(
    !html.contains("oembed-"),
    "A `link` payload embeds nothing. Got:\n{html}"
  );
  assert_html_contains(&html, &[
    r#"class="link-card""#,
    r#"<span class="link-card-title">Link-kind post</span>"#,
  ]);
}

#[tokio::test]
async fn test_card_title_falls_back_to_the_title_element() {
  let fx = blog().await;
  let url = page_url(&fx, "/bare");

  let html = render_default(&format!("{url}\n")).await;

  assert_html_contains(&html, &[
    r#"<span class="link-card-title">Bare page</span>"#,
  ]);
}

#[tokio::test]
async fn test_card_title_falls_back_to_the_url_itself() {
  let fx = blog().await;
  let url = page_url(&fx, "/notitle");

  let html = render_default(&format!("{url}\n")).await;

  assert_html_contains(&html, &[&format!(
    r#"<span class="link-card-title">{url}</span>"#
  )]);
}

#[tokio::test]
async fn test_unreachable_page_degrades_to_the_plain_link() {
  // Nothing listens on port 1; the candidate stays a plain link.
  let url = "http://127.0.0.1:1/nope";

  let html = render_default(&format!("{url}\n")).await;

  assert_html_contains(&html, &[&format!(r#"<a href="{url}">{url}</a>"#)]);
  assert!(!html.contains("link-card"));
}

#[tokio::test]
async fn test_multiple_candidates_resolve_in_document_order() {
  let fx = blog().await;
  let article = page_url(&fx, "/article");
  let plain = page_url(&fx, "/plain");

  let md = format!("# Digest\n\n{article}\n\nSome prose between.\n\n{plain}\n");
  let html = render_default(&md).await;

  assert_html_contains(&html, &[
    "<h1>Digest</h1>",
    "<p>Some prose between.</p>",
    r#"<div class="oembed oembed-rich">"#,
    r#"class="link-card""#,
  ]);

  let rich = html.find("oembed-rich").expect("rich embed present");
  let card = html.find("link-card").expect("card present");
  assert!(rich < card, "Embeds out of document order:\n{html}");
}

#[tokio::test]
async fn test_link_with_custom_text_is_left_alone() {
  let fx = blog().await;
  let article = page_url(&fx, "/article");
  let plain = page_url(&fx, "/plain");

  let md =
    format!("{article}\n\nAlso read [the plain post]({plain}) sometime.\n");
  let html = render_default(&md).await;

  assert_html_contains(&html, &[
    r#"<div class="oembed oembed-rich">"#,
    &format!(r#"<a href="{plain}">the plain post</a>"#),
  ]);
  assert!(!html.contains("link-card"));
}

#[tokio::test]
async fn test_card_only_transformer_list_skips_oembed_entirely() {
  let fx = blog().await;
  let url = page_url(&fx, "/article");

  let preset = Preset::new(PresetOptions {
    gfm:   Toggle::Defaults,
    embed: Toggle::Overrides(EmbedOverrides {
      transformers: Some(vec![EmbedTransformer::LinkCard]),
      ..EmbedOverrides::default()
    }),
  });
  let processor = Processor::new(preset).expect("processor construction");
  let html = processor.render(&format!("{url}\n")).await;

  // The article advertises an oEmbed endpoint, but the chain never asks.
  assert!(!html.contains("oembed-rich"));
  assert_html_contains(&html, &[
    r#"class="link-card""#,
    r#"<span class="link-card-title">An embedded article</span>"#,
    r#"<span class="link-card-description">Article description for cards.</span>"#,
  ]);
}
