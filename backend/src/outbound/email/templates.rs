//! HTML bodies for transactional emails.

use crate::domain::ports::{CommentEmail, WelcomeEmail};

/// Rendered message ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmail {
    /// Subject line.
    pub subject: String,
    /// HTML body.
    pub html: String,
    /// Provider category tag.
    pub category: &'static str,
}

/// Escape text for inclusion in HTML element content and attributes.
fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Render the signup greeting.
pub fn welcome(email: &WelcomeEmail) -> RenderedEmail {
    let name = escape(&email.name);
    let link = escape(email.profile_url.as_str());
    RenderedEmail {
        subject: "Welcome to Proflink".to_owned(),
        html: format!(
            "<h1>Welcome to Proflink, {name}!</h1>\
             <p>Your professional network starts here. Complete your profile so \
             colleagues can find you.</p>\
             <p><a href=\"{link}\">Complete your profile</a></p>"
        ),
        category: "welcome",
    }
}

/// Render the new-comment alert.
pub fn comment_notification(email: &CommentEmail) -> RenderedEmail {
    let recipient = escape(&email.recipient_name);
    let commenter = escape(&email.commenter_name);
    let comment = escape(&email.comment);
    let link = escape(email.post_url.as_str());
    RenderedEmail {
        subject: "New comment on your post".to_owned(),
        html: format!(
            "<p>Hello {recipient},</p>\
             <p>{commenter} commented on your post:</p>\
             <blockquote>{comment}</blockquote>\
             <p><a href=\"{link}\">View the post</a></p>"
        ),
        category: "comment_notification",
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::EmailAddress;
    use url::Url;

    #[test]
    fn comment_text_is_escaped() {
        let rendered = comment_notification(&CommentEmail {
            to: EmailAddress::new("alice@example.com").expect("valid email"),
            recipient_name: "Alice".to_owned(),
            commenter_name: "Bob".to_owned(),
            post_url: Url::parse("http://localhost:5173/post/1").expect("valid url"),
            comment: "<script>alert('hi')</script>".to_owned(),
        });

        assert!(!rendered.html.contains("<script>"));
        assert!(rendered.html.contains("&lt;script&gt;"));
        assert!(rendered.html.contains("http://localhost:5173/post/1"));
    }

    #[test]
    fn welcome_links_to_the_profile() {
        let rendered = welcome(&WelcomeEmail {
            to: EmailAddress::new("alice@example.com").expect("valid email"),
            name: "Alice".to_owned(),
            profile_url: Url::parse("http://localhost:5173/profile/alice").expect("valid url"),
        });

        assert_eq!(rendered.category, "welcome");
        assert!(rendered.html.contains("Welcome to Proflink, Alice!"));
        assert!(rendered.html.contains("href=\"http://localhost:5173/profile/alice\""));
    }
}
