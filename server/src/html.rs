use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use search_core::SearchResult;
use std::path::{Component, Path};

// Characters that cannot appear raw inside one path segment of an href.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'&')
    .add(b'\'')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

const SEARCH_FORM: &str = r#"<html><head><title>search</title></head>
<body>
<center><h1>search</h1></center>
<p>
<center>
<form action="/query" method="get">
<input type="text" size=30 name="terms" />
<input type="submit" value="Search" />
</form>
</center><p>
"#;

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

pub fn search_page() -> String {
    format!("{SEARCH_FORM}</body>\n</html>\n")
}

/// The search form followed by a ranked list of matching documents.
///
/// Links point at `/static/` plus the document's path relative to `root`.
pub fn results_page(query: &str, results: &[SearchResult], root: &Path) -> String {
    let mut html = String::from(SEARCH_FORM);
    html.push_str(&format!(
        "<p><br>\n{} results found for <b>{}</b>\n<p>\n\n<ul>\n",
        results.len(),
        escape_html(query)
    ));
    for result in results {
        let name = escape_html(&result.document);
        html.push_str(&format!(
            " <li> <a href=\"/static/{}\">{}</a> [{}]<br>\n",
            static_href(&result.document, root),
            name,
            result.rank
        ));
    }
    html.push_str("</ul>\n</body>\n</html>\n");
    html
}

fn static_href(document: &str, root: &Path) -> String {
    let path = Path::new(document);
    let relative = path.strip_prefix(root).unwrap_or(path);
    let segments: Vec<String> = relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(segment) => {
                Some(utf8_percent_encode(&segment.to_string_lossy(), SEGMENT).to_string())
            }
            _ => None,
        })
        .collect();
    segments.join("/")
}
