use url::Url;
use usersearch_core::{Avatar, SearchStatusView, SearchViewModel, UserRowView};

/// Turns a published view into the lines printed for one frame.
pub fn render(view: &SearchViewModel, avatar_base: Option<&Url>) -> Vec<String> {
    let mut lines = vec![format!("search> {}", view.query)];
    if !view.panel_open {
        lines.push("  (results hidden)".to_string());
        return lines;
    }

    match &view.status {
        SearchStatusView::Idle => lines.push("  Type to search users".to_string()),
        SearchStatusView::Loading => lines.push("  Searching...".to_string()),
        SearchStatusView::NoMatches => lines.push("  No users found".to_string()),
        SearchStatusView::Failed(message) => lines.push(format!("  Error: {message}")),
        SearchStatusView::Results(rows) => {
            lines.extend(rows.iter().map(|row| format_row(row, avatar_base)));
        }
    }
    lines
}

fn format_row(row: &UserRowView, avatar_base: Option<&Url>) -> String {
    let avatar = avatar_label(&row.avatar, avatar_base);
    match &row.handle {
        Some(handle) => format!("  {avatar} {} (@{handle})", row.name),
        None => format!("  {avatar} {}", row.name),
    }
}

fn avatar_label(avatar: &Avatar, avatar_base: Option<&Url>) -> String {
    match (avatar, avatar_base) {
        (Avatar::Account(id), Some(base)) => match avatar_url(base, id) {
            Some(url) => format!("<{url}>"),
            None => format!("[#{id}]"),
        },
        (Avatar::Account(id), None) => format!("[#{id}]"),
        (Avatar::Initials(initials), _) => format!("[{initials}]"),
    }
}

/// Appends the account id as one encoded path segment, so it can never leave the base path.
fn avatar_url(base: &Url, id: &str) -> Option<Url> {
    let mut url = base.clone();
    url.path_segments_mut().ok()?.pop_if_empty().push(id);
    Some(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn view(status: SearchStatusView) -> SearchViewModel {
        SearchViewModel {
            query: "ad".to_string(),
            status,
            panel_open: true,
            generation: 1,
        }
    }

    #[test]
    fn renders_feedback_states() {
        assert_eq!(
            render(&view(SearchStatusView::Loading), None),
            vec!["search> ad", "  Searching..."]
        );
        assert_eq!(
            render(&view(SearchStatusView::NoMatches), None),
            vec!["search> ad", "  No users found"]
        );
        assert_eq!(
            render(&view(SearchStatusView::Failed("boom".to_string())), None),
            vec!["search> ad", "  Error: boom"]
        );
    }

    #[test]
    fn renders_rows_with_avatar_fallbacks() {
        let base = Url::parse("https://avatars.example.com/u/").unwrap();
        let rows = vec![
            UserRowView {
                name: "Ada Lovelace".to_string(),
                handle: Some("ada".to_string()),
                avatar: Avatar::Account("7".to_string()),
            },
            UserRowView {
                name: "Adam".to_string(),
                handle: None,
                avatar: Avatar::Initials("A".to_string()),
            },
        ];
        assert_eq!(
            render(&view(SearchStatusView::Results(rows.clone())), Some(&base)),
            vec![
                "search> ad",
                "  <https://avatars.example.com/u/7> Ada Lovelace (@ada)",
                "  [A] Adam",
            ]
        );
        assert_eq!(
            render(&view(SearchStatusView::Results(rows)), None)[1],
            "  [#7] Ada Lovelace (@ada)"
        );
    }

    #[test]
    fn account_ids_stay_under_the_avatar_base() {
        let base = Url::parse("https://avatars.example.com/u/").unwrap();
        for id in ["../admin", "//evil.example.net/x", "a?b#c"] {
            let label = avatar_label(&Avatar::Account(id.to_string()), Some(&base));
            assert!(
                label.starts_with("<https://avatars.example.com/u/"),
                "{id:?} escaped the base: {label}"
            );
            assert_eq!(label.matches('/').count(), 4, "{id:?} added segments: {label}");
        }

        let no_slash = Url::parse("https://avatars.example.com/u").unwrap();
        assert_eq!(
            avatar_label(&Avatar::Account("7".to_string()), Some(&no_slash)),
            "<https://avatars.example.com/u/7>"
        );
    }

    #[test]
    fn opaque_avatar_base_falls_back_to_id() {
        let base = Url::parse("mailto:avatars@example.com").unwrap();
        assert_eq!(
            avatar_label(&Avatar::Account("7".to_string()), Some(&base)),
            "[#7]"
        );
    }

    #[test]
    fn closed_panel_hides_status() {
        let mut closed = view(SearchStatusView::Loading);
        closed.panel_open = false;
        assert_eq!(render(&closed, None), vec!["search> ad", "  (results hidden)"]);
    }
}
