use crate::parsers::html;
use crate::results::HeadingLevel;

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html>
<head>
  <title>  Example Page  </title>
  <meta name="description" content="A page about examples">
  <meta property="og:title" content="OG Example">
  <meta charset="utf-8">
</head>
<body>
  <h1>Main <em>title</em></h1>
  <h2>First section</h2>
  <h3></h3>
  <h2>Second section</h2>
  <p>Short one.</p>
  <p>This paragraph is long enough to be considered real content.</p>
  <a href="/about">About us</a>
  <a>No href</a>
  <a href="https://other.example.org/x">  External  </a>
  <img src="/logo.png" alt="Logo" width="120" height="40">
  <img src="data:image/png;base64,AAAA">
  <img alt="missing src">
</body>
</html>"#;

    #[test]
    fn test_parse_title_and_headings() {
        let raw = html::parse(PAGE);
        assert_eq!(raw.title, "  Example Page  ");

        let levels: Vec<HeadingLevel> = raw.headings.iter().map(|h| h.level).collect();
        assert_eq!(
            levels,
            vec![
                HeadingLevel::H1,
                HeadingLevel::H2,
                HeadingLevel::H3,
                HeadingLevel::H2
            ]
        );
        assert_eq!(raw.headings[0].text, "Main title");
        assert_eq!(raw.headings[2].text, "");
    }

    #[test]
    fn test_parse_paragraphs_unfiltered() {
        let raw = html::parse(PAGE);
        assert_eq!(raw.paragraphs.len(), 2);
        assert_eq!(raw.paragraphs[0], "Short one.");
    }

    #[test]
    fn test_parse_anchors_require_href() {
        let raw = html::parse(PAGE);
        assert_eq!(raw.anchors.len(), 2);
        assert_eq!(raw.anchors[0].href, "/about");
        assert_eq!(raw.anchors[0].text, "About us");
        assert_eq!(raw.anchors[1].text, "  External  ");
    }

    #[test]
    fn test_parse_images_and_meta() {
        let raw = html::parse(PAGE);
        assert_eq!(raw.images.len(), 3);
        assert_eq!(raw.images[0].src.as_deref(), Some("/logo.png"));
        assert_eq!(raw.images[0].alt.as_deref(), Some("Logo"));
        assert_eq!(raw.images[0].width.as_deref(), Some("120"));
        assert_eq!(raw.images[2].src, None);

        assert_eq!(raw.meta.len(), 3);
        assert_eq!(raw.meta[0].name.as_deref(), Some("description"));
        assert_eq!(raw.meta[1].property.as_deref(), Some("og:title"));
        assert_eq!(raw.meta[2].content, None);
    }

    #[test]
    fn test_parse_empty_document() {
        let raw = html::parse("");
        assert_eq!(raw.title, "");
        assert!(raw.headings.is_empty());
        assert!(raw.paragraphs.is_empty());
        assert!(raw.anchors.is_empty());
        assert!(raw.images.is_empty());
    }
}
