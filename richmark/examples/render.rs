use std::{env, fs};

use richmark::{Preset, Processor};

const SAMPLE: &str = "\
# richmark demo

GFM niceties work out of the box:

| Feature | Status |
|---------|--------|
| Tables  | yes    |

- [x] ~~strikethrough~~ and task lists
- [ ] anything else?

A paragraph holding nothing but a bare link becomes an embed (or stays a
plain link when the page cannot be reached):

https://www.youtube.com/watch?v=dQw4w9WgXcQ
";

/// Render a Markdown file (or a built-in sample) to fragment HTML on
/// stdout. Run with `RUST_LOG=richmark=debug` to watch the pipeline work.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  env_logger::init();

  let markdown = match env::args().nth(1) {
    Some(path) => fs::read_to_string(path)?,
    None => SAMPLE.to_string(),
  };

  let processor = Processor::new(Preset::default())?;
  let html = processor.render(&markdown).await;

  println!("{html}");
  Ok(())
}
