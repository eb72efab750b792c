//! HTML pages for the review front end
//!
//! Every page is the shared layout with a title and a body. The body is
//! substituted last so text taken from the request or the model is never
//! scanned for placeholders.

use askama_escape::{escape, Html};
use axum::http::StatusCode;
use coderev_core::ReviewState;

const LAYOUT_TEMPLATE: &str = include_str!("templates/layout.html");
const INDEX_TEMPLATE: &str = include_str!("templates/index.html");

/// Escape text for inclusion in HTML element content or attribute values
pub fn escape_html(text: &str) -> String {
    escape(text, Html).to_string()
}

fn layout(title: &str, body: &str) -> String {
    LAYOUT_TEMPLATE
        .replace("{title}", &escape_html(title))
        .replace("{body}", body)
}

/// The empty submission form
pub fn form_page() -> String {
    layout("Solution Review", INDEX_TEMPLATE)
}

fn section(heading: &str, text: &str) -> String {
    format!(
        "<section>\n<h2>{}</h2>\n<pre>{}</pre>\n</section>\n",
        heading,
        escape_html(text)
    )
}

/// The final review state
pub fn result_page(state: &ReviewState) -> String {
    let mut body = String::from("<h1>Review Result</h1>\n");

    body.push_str(&section("Question", &state.question));
    body.push_str(&section("Your Solution", &state.user_solution));
    body.push_str(&section(
        "Detected Language",
        state.language.as_deref().unwrap_or(""),
    ));
    body.push_str(&section(
        "Optimized Solution",
        state.optimized_solution.as_deref().unwrap_or(""),
    ));
    body.push_str(&section("Feedback", state.feedback.as_deref().unwrap_or("")));
    if let Some(ref explanation) = state.detailed_explanation {
        body.push_str(&section("Detailed Explanation", explanation));
    }
    body.push_str("<p><a href=\"/\">Review another solution</a></p>\n");

    layout("Review Result", &body)
}

/// A failed request; carries no review state
pub fn error_page(status: StatusCode, message: &str) -> String {
    let body = format!(
        "<h1>{}</h1>\n<p class=\"error\">{}</p>\n<p><a href=\"/\">Back</a></p>\n",
        status,
        escape_html(message)
    );
    layout("Review Failed", &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        let escaped = escape_html(r#"<script>alert("x" & 'y')</script>"#);
        for raw in ['<', '>', '"', '\''] {
            assert!(!escaped.contains(raw), "{:?} left unescaped", raw);
        }
        assert!(escaped.contains("&#60;script&#62;"));
        assert!(escaped.contains("&#38;"));
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_form_page_posts_both_fields() {
        let page = form_page();
        assert!(page.contains(r#"<form method="post" action="/">"#));
        assert!(page.contains(r#"name="question""#));
        assert!(page.contains(r#"name="user_solution""#));
        assert!(!page.contains("{body}"));
    }

    #[test]
    fn test_result_page_without_explanation() {
        let mut state = ReviewState::new("Two sum", "vector<int> f() {}");
        state.language = Some("cpp".to_string());
        state.optimized_solution = Some("int main() {}".to_string());
        state.feedback = Some("Looks fine".to_string());

        let page = result_page(&state);
        assert!(page.contains("<pre>cpp</pre>"));
        assert!(page.contains("vector&#60;int&#62; f() {}"));
        assert!(page.contains("Looks fine"));
        assert!(!page.contains("Detailed Explanation"));
    }

    #[test]
    fn test_result_page_with_explanation() {
        let mut state = ReviewState::new("q", "s");
        state.detailed_explanation = Some("Use a hash map.".to_string());
        let page = result_page(&state);
        assert!(page.contains("Detailed Explanation"));
        assert!(page.contains("Use a hash map."));
    }

    #[test]
    fn test_user_text_is_not_treated_as_placeholder() {
        let state = ReviewState::new("{title}", "{body}");
        let page = result_page(&state);
        assert!(page.contains("<pre>{title}</pre>"));
        assert!(page.contains("<pre>{body}</pre>"));
        assert!(page.contains("<title>Review Result</title>"));
    }

    #[test]
    fn test_error_page() {
        let page = error_page(StatusCode::BAD_GATEWAY, "provider <down>");
        assert!(page.contains("502 Bad Gateway"));
        assert!(page.contains("provider &#60;down&#62;"));
    }
}
