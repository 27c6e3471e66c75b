// src/utils/markdown.rs

//! Problem statement HTML → markdown.
//!
//! Covers the subset of HTML the judge uses in statements: paragraphs,
//! headings, emphasis, inline code, `pre` blocks, lists, links, images and
//! super/subscripts. Anything else is rendered as its text.

use scraper::{ElementRef, Html, Node};

/// Convert an HTML fragment to markdown.
pub fn html_to_markdown(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let mut renderer = Renderer::default();
    renderer.children(fragment.root_element());
    tidy(&renderer.out)
}

#[derive(Default)]
struct Renderer {
    out: String,
    list_depth: usize,
}

impl Renderer {
    fn children(&mut self, element: ElementRef<'_>) {
        for child in element.children() {
            if let Some(child) = ElementRef::wrap(child) {
                self.element(child);
            } else if let Node::Text(text) = child.value() {
                self.text(text);
            }
        }
    }

    fn text(&mut self, text: &str) {
        let words: Vec<&str> = text.split_whitespace().collect();
        let at_line_start =
            self.out.is_empty() || self.out.ends_with('\n') || self.out.ends_with(' ');

        if words.is_empty() {
            if !text.is_empty() && !at_line_start {
                self.out.push(' ');
            }
            return;
        }

        if text.starts_with(char::is_whitespace) && !at_line_start {
            self.out.push(' ');
        }
        self.out.push_str(&words.join(" "));
        if text.ends_with(char::is_whitespace) {
            self.out.push(' ');
        }
    }

    fn wrap(&mut self, element: ElementRef<'_>, marker: &str) {
        self.out.push_str(marker);
        self.children(element);
        self.out.push_str(marker);
    }

    fn block(&mut self, element: ElementRef<'_>) {
        self.out.push_str("\n\n");
        self.children(element);
        self.out.push_str("\n\n");
    }

    fn element(&mut self, element: ElementRef<'_>) {
        let name = element.value().name();
        match name {
            "pre" => {
                let code: String = element.text().collect();
                self.out.push_str("\n```\n");
                self.out.push_str(code.replace("```", "\\`\\`\\`").trim());
                self.out.push_str("\n```\n");
            }
            "code" => self.wrap(element, "`"),
            "sup" => {
                self.out.push('^');
                self.children(element);
            }
            "sub" => {
                self.out.push('_');
                self.children(element);
            }
            "strong" | "b" => self.wrap(element, "**"),
            "em" | "i" => self.wrap(element, "*"),
            "br" => self.out.push('\n'),
            "hr" => self.out.push_str("\n\n---\n\n"),
            "p" | "div" | "blockquote" | "table" => self.block(element),
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                let level = name[1..].parse::<usize>().unwrap_or(1);
                self.out.push_str("\n\n");
                self.out.push_str(&"#".repeat(level));
                self.out.push(' ');
                self.children(element);
                self.out.push_str("\n\n");
            }
            "ul" | "ol" => self.list(element, name == "ol"),
            "a" => {
                let href = element.value().attr("href").unwrap_or_default();
                self.out.push('[');
                self.children(element);
                self.out.push_str("](");
                self.out.push_str(href);
                self.out.push(')');
            }
            "img" => {
                let alt = element.value().attr("alt").unwrap_or_default();
                let src = element.value().attr("src").unwrap_or_default();
                self.out.push_str(&format!("![{alt}]({src})"));
            }
            "script" | "style" => {}
            _ => self.children(element),
        }
    }

    fn list(&mut self, element: ElementRef<'_>, ordered: bool) {
        let indent = "  ".repeat(self.list_depth);
        self.list_depth += 1;

        let items = element
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|child| child.value().name() == "li");
        for (i, item) in items.enumerate() {
            self.out.push('\n');
            self.out.push_str(&indent);
            if ordered {
                self.out.push_str(&format!("{}. ", i + 1));
            } else {
                self.out.push_str("- ");
            }
            self.children(item);
        }

        self.list_depth -= 1;
        self.out.push_str("\n\n");
    }
}

/// Trim trailing spaces and collapse runs of blank lines, leaving fenced
/// code untouched.
fn tidy(raw: &str) -> String {
    let mut lines: Vec<&str> = Vec::new();
    let mut in_fence = false;
    let mut blank_run = 0;

    for line in raw.lines() {
        if line.trim_start().starts_with("```") {
            in_fence = !in_fence;
        }
        let line = if in_fence { line } else { line.trim_end() };

        if line.is_empty() && !in_fence {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
        } else {
            blank_run = 0;
        }
        lines.push(line);
    }

    lines.join("\n").trim().to_string()
}
