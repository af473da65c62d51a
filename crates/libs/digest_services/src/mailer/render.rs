use crate::digest::{Digest, Recipient};
use app_state::DigestSettings;
use std::fmt::Write;

/// A fully rendered email, ready to hand to a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmail {
    pub subject: String,
    pub html: String,
    pub text: String,
}

/// Renders the daily digest as an HTML body with a plain-text alternative.
#[must_use]
pub fn render_digest(digest: &Digest, settings: &DigestSettings) -> RenderedEmail {
    let mut html = String::new();
    let mut text = String::new();

    let greeting = format!("Hello {},", digest.recipient.display_name);
    let _ = writeln!(html, "<p>{}</p>", escape_html(&greeting));
    let _ = writeln!(text, "{greeting}");
    text.push('\n');

    let intro = "New photos were added to albums you follow:";
    let _ = writeln!(html, "<p>{intro}</p>");
    let _ = writeln!(text, "{intro}");

    html.push_str("<ul>\n");
    for update in &digest.updates {
        let phrase = item_phrase(update.new_item_count);
        let shared = if update.album.is_shared {
            format!(" (shared by {})", update.album.owner_user_id)
        } else {
            String::new()
        };
        let _ = writeln!(
            html,
            "<li><strong>{}</strong>{}: {}</li>",
            escape_html(&update.album.name),
            escape_html(&shared),
            phrase,
        );
        let _ = writeln!(text, "- {}{}: {}", update.album.name, shared, phrase);
    }
    html.push_str("</ul>\n");
    text.push('\n');

    let summary = format!(
        "That's {} across {} in the last {}.",
        item_phrase(digest.total_new_items),
        album_phrase(digest.updates.len()),
        window_phrase(settings.window_hours),
    );
    let _ = writeln!(html, "<p>{}</p>", escape_html(&summary));
    let _ = writeln!(text, "{summary}");
    text.push('\n');

    let _ = writeln!(
        html,
        r#"<p><a href="{}">View your albums</a></p>"#,
        escape_html(&settings.photos_url)
    );
    let _ = writeln!(text, "View your albums: {}", settings.photos_url);

    let footer = format!("Sent by {}", settings.instance_name);
    let _ = writeln!(html, "<p><small>{}</small></p>", escape_html(&footer));
    let _ = writeln!(text, "\n{footer}");

    RenderedEmail {
        subject: settings.subject.clone(),
        html,
        text,
    }
}

/// Renders the settings-page test email. Plain text only.
#[must_use]
pub fn render_test_email(recipient: &Recipient, settings: &DigestSettings) -> RenderedEmail {
    let text = format!(
        "Hello {},\n\nThis is a test email from {}. \
         Album update notifications will be delivered to this address.\n",
        recipient.display_name, settings.instance_name,
    );
    let html = format!(
        "<p>{}</p>\n<p>{}</p>\n",
        escape_html(&format!("Hello {},", recipient.display_name)),
        escape_html(&format!(
            "This is a test email from {}. Album update notifications will be delivered to this address.",
            settings.instance_name,
        )),
    );
    RenderedEmail {
        subject: format!("Test Email - {}", settings.instance_name),
        html,
        text,
    }
}

fn item_phrase(count: u64) -> String {
    if count == 1 {
        "1 new photo".to_string()
    } else {
        format!("{count} new photos")
    }
}

fn window_phrase(window_hours: i64) -> String {
    match window_hours {
        24 => "24 hours".to_string(),
        1 => "hour".to_string(),
        hours => format!("{hours} hours"),
    }
}

fn album_phrase(count: usize) -> String {
    if count == 1 {
        "1 album".to_string()
    } else {
        format!("{count} albums")
    }
}

fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::album_ref::SourceKind;
    use crate::digest::AlbumUpdate;
    use crate::sources::AlbumInfo;

    fn settings() -> DigestSettings {
        DigestSettings {
            window_hours: 24,
            subject: "Daily Album Update - New Photos Added".into(),
            photos_url: "https://cloud.example.com/apps/photos/".into(),
            instance_name: "My Photos".into(),
        }
    }

    fn digest(updates: Vec<AlbumUpdate>) -> Digest {
        let total_new_items = updates.iter().map(|u| u.new_item_count).sum();
        Digest {
            recipient: Recipient {
                user_id: "alice".into(),
                display_name: "Alice".into(),
                email: "alice@example.com".into(),
            },
            updates,
            total_new_items,
        }
    }

    fn update(name: &str, owner: &str, shared: bool, count: u64) -> AlbumUpdate {
        AlbumUpdate {
            album: AlbumInfo {
                name: name.into(),
                owner_user_id: owner.into(),
                is_shared: shared,
            },
            kind: SourceKind::Photos,
            new_item_count: count,
        }
    }

    #[test]
    fn singular_and_plural_phrasing() {
        let rendered = render_digest(
            &digest(vec![update("A", "alice", false, 1), update("B", "alice", false, 4)]),
            &settings(),
        );
        assert!(rendered.text.contains("- A: 1 new photo\n"));
        assert!(rendered.text.contains("- B: 4 new photos\n"));
        assert!(rendered.text.contains("That's 5 new photos across 2 albums"));
    }

    #[test]
    fn summary_reflects_configured_window() {
        let rendered = render_digest(&digest(vec![update("A", "alice", false, 1)]), &settings());
        assert!(rendered.text.contains("in the last 24 hours"));

        let mut weekly = settings();
        weekly.window_hours = 168;
        let rendered = render_digest(&digest(vec![update("A", "alice", false, 1)]), &weekly);
        assert!(rendered.text.contains("in the last 168 hours"));
        assert!(!rendered.text.contains("yesterday"));
    }

    #[test]
    fn shared_albums_name_the_owner() {
        let rendered = render_digest(&digest(vec![update("Trip", "bob", true, 2)]), &settings());
        assert!(rendered.text.contains("- Trip (shared by bob): 2 new photos"));
        assert!(rendered.html.contains("(shared by bob)"));
    }

    #[test]
    fn album_names_are_html_escaped() {
        let rendered = render_digest(
            &digest(vec![update("<b>Sneaky</b> & co", "alice", false, 1)]),
            &settings(),
        );
        assert!(rendered.html.contains("&lt;b&gt;Sneaky&lt;/b&gt; &amp; co"));
        assert!(!rendered.html.contains("<b>Sneaky</b>"));
        assert!(rendered.text.contains("<b>Sneaky</b> & co"));
    }

    #[test]
    fn digest_uses_configured_subject_and_links() {
        let rendered = render_digest(&digest(vec![update("A", "alice", false, 1)]), &settings());
        assert_eq!(rendered.subject, "Daily Album Update - New Photos Added");
        assert!(rendered.html.contains("https://cloud.example.com/apps/photos/"));
        assert!(rendered.text.contains("Sent by My Photos"));
    }
}
