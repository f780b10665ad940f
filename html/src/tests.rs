use super::*;

const SAMPLES: &[&str] = &[
    r#"<div class="a"><span>hi</span></div>"#,
    r#"<!DOCTYPE html>
<html lang="en">
    <head>
        <meta charset="utf-8"/>
        <title>The minimal, valid HTML5 document</title>
    </head>
    <body>
        <!-- User-visible content goes in the body -->
        <p class='lead' hidden>Some {{ user.name }} paragraph</p>
        Some untagged text
        <br>
    </body>
</html>"#,
    r#"<ul>{{ items }}<li v-for="i in list" :key='i'>{{ i > 0 ? "}}" : i }}</li></ul>"#,
    "only text",
    "<p>héllo <b title='wörld'>wörld</b></p>",
    "<div><p>unclosed at end of input",
];

fn element(item: &ContentItem) -> &Element {
    match item {
        ContentItem::Element(e) => e,
        other => panic!("expected an element, got {other:?}"),
    }
}

fn check_element(src: &str, e: &Element) {
    let text = e.source_text(src).unwrap();
    match &e.kind {
        ElementKind::Comment(comment) => {
            assert!(text.trim_start().starts_with("<!--"));
            assert!(text.ends_with("-->"));
            assert_eq!(comment.close_start + 3, e.end());
        }
        ElementKind::Markup(markup) => {
            assert_eq!(&text[..1 + markup.name.len()], format!("<{}", markup.name));
            for attr in &markup.attributes {
                assert!(attr.source_text(src).unwrap().starts_with(&attr.keyword));
                if let Some(value) = &attr.value {
                    let raw_end = value.raw_start + value.raw.len();
                    assert_eq!(&src[value.raw_start..raw_end], value.raw);
                    assert_eq!(raw_end, attr.end());
                }
            }
            match &markup.body {
                None => assert!(text.ends_with('>')),
                Some(body) => {
                    if let Some(close) = &body.close_tag {
                        assert!(text.ends_with(close.source_text(src).unwrap()));
                        assert_eq!(close.end(), e.end());
                    }
                    check_content(src, &body.content, e.index + 1);
                }
            }
        }
    }
}

fn check_content(src: &str, content: &[ContentItem], mut floor: usize) {
    for item in content {
        assert!(item.index() >= floor, "{item:?} overlaps its predecessor");
        assert!(item.length() > 0);
        assert!(item.end() <= src.len());
        let text = item.source_text(src).unwrap();
        match item {
            ContentItem::Text(t) => assert_eq!(text, t.text),
            ContentItem::Mustache(m) => {
                assert!(text.starts_with("{{") && text.ends_with("}}"));
                assert_eq!(&src[m.text_start..m.text_start + m.text.len()], m.text);
            }
            ContentItem::Element(e) => check_element(src, e),
        }
        floor = item.end();
    }
}

#[test]
fn test_spans_reproduce_source() {
    for src in SAMPLES {
        let doc = parse(src);
        assert_eq!(doc.error, None, "{src}");
        assert_eq!(doc.length, src.len());
        check_content(src, &doc.content, 0);
    }
}

#[test]
fn test_parse_is_idempotent() {
    for src in SAMPLES {
        assert_eq!(parse(src), parse(src));
    }
}

#[test]
fn test_nested_elements() {
    let src = r#"<div class="a"><span>hi</span></div>"#;
    let content = parse(src).into_result().unwrap();
    assert_eq!(content.len(), 1);

    let div = element(&content[0]);
    assert_eq!(div.name(), Some("div"));
    assert_eq!((div.index, div.length), (0, src.len()));
    let class = div.get_attribute("class").unwrap();
    assert_eq!(class.value(), Some("a"));
    assert_eq!(class.value.as_ref().unwrap().raw, r#""a""#);

    let div_content = div.content().unwrap();
    assert_eq!(div_content.len(), 1);
    let span = element(&div_content[0]);
    assert_eq!(span.name(), Some("span"));
    assert_eq!(
        span.content().unwrap(),
        [ContentItem::Text(TextItem {
            index: 21,
            length: 2,
            text: "hi".to_string(),
        })]
    );
    assert_eq!(
        span.close_tag(),
        Some(&CloseTag {
            index: 23,
            length: 7,
            name: "span".to_string(),
        })
    );
    assert_eq!(div.close_tag().unwrap().index, 30);
}

#[test]
fn test_void_elements() {
    for src in ["<br>", "<BR>", "<Meta charset='x'>", "<link rel=\"icon\">"] {
        let content = parse(src).into_result().unwrap();
        assert_eq!(content.len(), 1);
        let e = element(&content[0]);
        assert!(e.is_open_tag_only());
        assert_eq!(e.content(), None);
        assert_eq!(e.close_tag(), None);
        assert_eq!(e.length, src.len());
    }

    // the text after a void element is a sibling, not its body
    let content = parse("<br> after").into_result().unwrap();
    assert_eq!(content.len(), 2);
    assert!(matches!(&content[1], ContentItem::Text(t) if t.text == "after"));
}

#[test]
fn test_mustache_content() {
    let content = parse("<p>{{ name }}</p>").into_result().unwrap();
    let p = element(&content[0]);
    assert_eq!(
        p.content().unwrap(),
        [ContentItem::Mustache(MustacheItem {
            index: 3,
            length: 10,
            text: " name ".to_string(),
            text_start: 5,
        })]
    );
}

#[test]
fn test_text_around_mustache() {
    let src = "<p>Hello, {{ who }} and welcome</p>";
    let content = parse(src).into_result().unwrap();
    let texts: Vec<(&str, &str)> = element(&content[0])
        .content()
        .unwrap()
        .iter()
        .map(|item| match item {
            ContentItem::Text(t) => ("text", t.text.as_str()),
            ContentItem::Mustache(m) => ("mustache", m.text.as_str()),
            ContentItem::Element(_) => ("element", ""),
        })
        .collect();
    assert_eq!(
        texts,
        [("text", "Hello, "), ("mustache", " who "), ("text", "and welcome")]
    );
}

#[test]
fn test_comment_then_self_closed() {
    let content = parse("<!-- note --><div/>").into_result().unwrap();
    assert_eq!(content.len(), 2);

    let comment = element(&content[0]);
    assert_eq!(comment.name(), None);
    assert_eq!(comment.comment().unwrap().text, "note");
    assert_eq!((comment.index, comment.length), (0, 13));
    assert!(comment.attributes().is_empty());

    let div = element(&content[1]);
    assert_eq!(div.name(), Some("div"));
    assert_eq!((div.index, div.length), (13, 6));
    assert!(div.is_open_tag_only());
    assert_eq!(div.content(), None);
}

#[test]
fn test_doubled_quote_in_attribute() {
    let src = "<a href='it''s'>";
    let content = parse(src).into_result().unwrap();
    let a = element(&content[0]);
    let href = a.get_attribute("href").unwrap();
    let value = href.value.as_ref().unwrap();
    assert_eq!(value.raw, "'it''s'");
    assert_eq!(value.value, "it's");
    assert_eq!(&src[value.raw_start..value.raw_start + value.raw.len()], value.raw);
    // input ends inside <a>, which is tolerated
    assert_eq!(a.content(), Some(&[][..]));
    assert_eq!(a.close_tag(), None);
}

#[test]
fn test_missing_close_at_end_of_input() {
    let src = "<div><p>unclosed";
    let content = parse(src).into_result().unwrap();
    let div = element(&content[0]);
    assert_eq!(div.length, src.len());
    assert_eq!(div.close_tag(), None);
    let p = element(&div.content().unwrap()[0]);
    assert_eq!(p.close_tag(), None);
    assert!(matches!(&p.content().unwrap()[0], ContentItem::Text(t) if t.text == "unclosed"));
}

#[test]
fn test_close_tag_name_not_matched() {
    let content = parse("<div>x</span>").into_result().unwrap();
    let div = element(&content[0]);
    assert_eq!(div.close_tag().unwrap().name, "span");
}

#[test]
fn test_stray_close_tag_ends_document() {
    let doc = parse("a </x> b");
    assert_eq!(doc.error, None);
    assert_eq!(doc.length, 2);
    assert_eq!(doc.content.len(), 1);
}

#[test]
fn test_whitespace_only() {
    let doc = parse("  \n\t ");
    assert_eq!(doc.error, None);
    assert!(doc.content.is_empty());
    assert_eq!(doc.length, 5);
}

#[test]
fn test_unterminated_open_tag() {
    let doc = parse("<div");
    assert!(doc.content.is_empty());
    let err = doc.error.unwrap();
    assert_eq!(err.kind, ParseErrorKind::InvalidOpenTagText);
    assert_eq!(err.offset, 4);
    assert_eq!(err.preview, "");
    assert_eq!(err.to_string(), r#"invalid text in html open tag at position 4: """#);
}

#[test]
fn test_errors_abort_whole_parse() {
    let cases = [
        ("<p>{{ open </p>", ParseErrorKind::UnclosedMustache, 3),
        ("<div><!-- open", ParseErrorKind::UnclosedComment, 5),
        ("<p class=x></p>", ParseErrorKind::InvalidAttributeValue, 9),
        ("<p class='x></p>", ParseErrorKind::UnclosedAttributeValue, 9),
        ("<p><b>x</b </p>", ParseErrorKind::InvalidCloseTag, 7),
        ("<p>1 < 2</p>", ParseErrorKind::InvalidOpenTag, 5),
        ("<p %>", ParseErrorKind::InvalidOpenTagText, 2),
    ];
    for (src, kind, offset) in cases {
        let doc = parse(src);
        assert!(doc.content.is_empty(), "{src}");
        let err = doc.into_result().unwrap_err();
        assert_eq!((err.kind, err.offset), (kind, offset), "{src}");
    }
}

#[test]
fn test_error_preview_is_bounded() {
    let src = format!("<p>{{{{{}", "x".repeat(100));
    let err = parse(&src).error.unwrap();
    assert_eq!(err.preview.chars().count(), 20);
    assert!(err.preview.starts_with("{{xx"));
}

#[test]
fn test_max_depth() {
    let src = "<a><b><c></c></b></a>";
    let limited = |max_depth| parse_with_options(src, ParseOptions { max_depth: Some(max_depth) });

    let err = limited(2).error.unwrap();
    assert_eq!((err.kind, err.offset), (ParseErrorKind::NestingTooDeep, 6));
    assert_eq!(limited(3).error, None);
    assert_eq!(parse_with_options(src, ParseOptions::default()), parse(src));
}

#[test]
fn test_get_elements_by_name() {
    let src = r#"<a><b id="1"><b id="2"/></b><c><b id="3"/></c></a><!-- b --><b id="4"/>"#;
    let content = parse(src).into_result().unwrap();
    let ids = |found: Vec<&Element>| -> Vec<String> {
        found
            .iter()
            .map(|b| b.get_attribute("id").and_then(|a| a.value()).unwrap().to_string())
            .collect()
    };

    assert_eq!(ids(get_elements_by_name(&content, "b")), ["1", "2", "3", "4"]);
    assert_eq!(ids(element(&content[0]).get_elements_by_name("b")), ["1", "2", "3"]);
    assert!(get_elements_by_name(&content, "B").is_empty());
    assert_eq!(get_elements_by_name(&content, "a").len(), 1);
}

#[test]
fn test_get_attribute() {
    let content = parse(r#"<x a b="2" a="3"><y c="4"/></x>"#).into_result().unwrap();
    let x = element(&content[0]);
    assert_eq!(x.get_attribute("a").unwrap().value, None);
    assert_eq!(x.get_attribute("b").and_then(|a| a.value()), Some("2"));
    // descendants are not searched
    assert_eq!(x.get_attribute("c"), None);

    let comment = parse("<!-- c -->").into_result().unwrap();
    assert_eq!(element(&comment[0]).get_attribute("c"), None);
}
