//! Transcript Rendering
//!
//! Turns chat state into ratatui lines. Everything here is pure:
//! functions take state and a width and return styled lines, so the
//! whole transcript layout is testable without a terminal.
//!
//! Messages render as `You: ` / `Counsel: ` blocks with a hanging
//! indent, so wrapped lines align under the first content column.
//! Assistant messages with citations carry a one-line source
//! disclosure that Tab expands into the full citation list.

use crate::chat::{preview, ChatMessage, Role};
use crate::theme;
use gateway_core::Citation;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use textwrap::Options;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Indentation for the source disclosure under an answer.
const SOURCE_INDENT: &str = "  ";

/// Narrowest wrap width we will attempt. Below this the terminal is
/// unusable anyway and wrapping word-by-word keeps the layout intact.
const MIN_WRAP_WIDTH: usize = 10;

/// Renders the whole transcript as styled lines, oldest message first.
///
/// `width` is the inner width of the transcript area in terminal
/// cells. Scrolling happens in the caller; this function always
/// produces the full line list.
#[must_use]
pub fn transcript_lines(messages: &[ChatMessage], width: u16) -> Vec<Line<'static>> {
    let width = usize::from(width);
    let mut lines = Vec::new();

    for (index, message) in messages.iter().enumerate() {
        if index > 0 {
            lines.push(Line::default());
        }
        message_lines(message, width, &mut lines);
    }

    lines
}

/// The banner shown before the first question is asked.
#[must_use]
pub fn empty_state_lines() -> Vec<Line<'static>> {
    vec![
        Line::styled(
            "Counsel",
            Style::default()
                .fg(theme::COUNSEL_BLUE)
                .add_modifier(Modifier::BOLD),
        ),
        Line::default(),
        Line::styled(
            "Ask any legal question to get started.",
            Style::default().fg(theme::DIM_GRAY),
        ),
    ]
}

/// The one-line status bar under the input box.
#[must_use]
pub fn status_line(waiting: bool, tick: usize) -> Line<'static> {
    if waiting {
        let dots = ".".repeat(tick % 4);
        Line::styled(
            format!("Counsel is thinking{dots}"),
            Style::default().fg(theme::COUNSEL_BLUE),
        )
    } else {
        Line::styled(
            "Enter send · Tab sources · PgUp/PgDn scroll · Esc quit",
            Style::default().fg(theme::DIM_GRAY),
        )
    }
}

/// The visible tail of the input line, fitted to `budget` terminal
/// cells.
///
/// While the whole input fits it is returned unchanged. Once it
/// overflows, the newest end is kept so the user always sees what they
/// are typing. Widths are counted in cells, not chars, so wide
/// characters never push the tail past the box.
#[must_use]
pub fn input_tail(input: &str, budget: usize) -> String {
    if UnicodeWidthStr::width(input) <= budget {
        return input.to_string();
    }

    let mut used = 0;
    let mut kept = Vec::new();
    for c in input.chars().rev() {
        let cell_width = UnicodeWidthChar::width(c).unwrap_or(0);
        if used + cell_width > budget {
            break;
        }
        used += cell_width;
        kept.push(c);
    }
    kept.into_iter().rev().collect()
}

// ===== Message layout =====

fn role_style(role: Role) -> Style {
    let color = match role {
        Role::User => theme::USER_GREEN,
        Role::Assistant => theme::COUNSEL_BLUE,
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

fn message_lines(message: &ChatMessage, width: usize, lines: &mut Vec<Line<'static>>) {
    let prefix = message.role.prefix();
    let indent = " ".repeat(prefix.len());
    let wrap_width = width.saturating_sub(prefix.len()).max(MIN_WRAP_WIDTH);

    let mut first = true;
    for paragraph in message.content.split('\n') {
        if paragraph.is_empty() {
            // Preserve blank lines inside an answer.
            if !first {
                lines.push(Line::default());
            }
            continue;
        }

        for chunk in textwrap::wrap(paragraph, Options::new(wrap_width)) {
            if first {
                lines.push(Line::from(vec![
                    Span::styled(prefix, role_style(message.role)),
                    Span::raw(chunk.into_owned()),
                ]));
                first = false;
            } else {
                lines.push(Line::from(vec![
                    Span::raw(indent.clone()),
                    Span::raw(chunk.into_owned()),
                ]));
            }
        }
    }

    // A message with empty content still shows its author.
    if first {
        lines.push(Line::from(Span::styled(prefix, role_style(message.role))));
    }

    if message.role == Role::Assistant && !message.sources.is_empty() {
        disclosure_lines(message, width, lines);
    }
}

// ===== Source disclosure =====

fn disclosure_lines(message: &ChatMessage, width: usize, lines: &mut Vec<Line<'static>>) {
    let hint_style = Style::default().fg(theme::DIM_GRAY);

    if !message.sources_expanded {
        lines.push(Line::from(vec![
            Span::raw(SOURCE_INDENT),
            Span::styled(
                format!("View {} sources (Tab)", message.sources.len()),
                hint_style,
            ),
        ]));
        return;
    }

    lines.push(Line::from(vec![
        Span::raw(SOURCE_INDENT),
        Span::styled("Hide sources (Tab)", hint_style),
    ]));

    for citation in &message.sources {
        citation_lines(citation, width, lines);
    }
}

fn citation_lines(citation: &Citation, width: usize, lines: &mut Vec<Line<'static>>) {
    lines.push(Line::from(vec![
        Span::raw(SOURCE_INDENT),
        Span::styled(
            format!("\u{2022} {}", citation.metadata.source),
            Style::default().fg(theme::SOURCE_GOLD),
        ),
    ]));

    lines.push(Line::from(vec![
        Span::raw(SOURCE_INDENT),
        Span::styled(
            format!(
                "  Page {} of {}",
                citation.metadata.page_label, citation.metadata.total_pages
            ),
            Style::default().fg(theme::DIM_GRAY),
        ),
    ]));

    let body_indent = format!("{SOURCE_INDENT}  ");
    let wrap_width = width.saturating_sub(body_indent.len()).max(MIN_WRAP_WIDTH);
    for chunk in textwrap::wrap(&preview(&citation.content), Options::new(wrap_width)) {
        lines.push(Line::from(vec![
            Span::raw(body_indent.clone()),
            Span::raw(chunk.into_owned()),
        ]));
    }
}

// ===== Tests =====

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::ChatMessage;
    use gateway_core::CitationMetadata;
    use pretty_assertions::assert_eq;

    fn line_text(line: &Line<'_>) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    fn citation(act: &str, section: &str, content: &str) -> Citation {
        Citation {
            content: content.to_string(),
            metadata: CitationMetadata::for_act_section(act, section),
        }
    }

    #[test]
    fn transcript_prefixes_messages_by_role() {
        let messages = vec![
            ChatMessage::user("What is Section 302?"),
            ChatMessage::assistant("It prescribes the punishment for murder.", Vec::new()),
        ];

        let lines = transcript_lines(&messages, 80);
        let texts: Vec<String> = lines.iter().map(line_text).collect();

        assert_eq!(texts[0], "You: What is Section 302?");
        // Blank separator between messages.
        assert_eq!(texts[1], "");
        assert_eq!(texts[2], "Counsel: It prescribes the punishment for murder.");
    }

    #[test]
    fn wrapped_lines_hang_under_the_prefix() {
        let messages = vec![ChatMessage::user(
            "a question long enough that it cannot possibly fit on one narrow line",
        )];

        let lines = transcript_lines(&messages, 30);
        assert!(lines.len() > 1);
        assert!(line_text(&lines[0]).starts_with("You: "));
        for line in &lines[1..] {
            assert!(line_text(line).starts_with("     "));
        }
    }

    #[test]
    fn answer_newlines_are_preserved() {
        let messages = vec![ChatMessage::assistant("First point.\nSecond point.", Vec::new())];

        let lines = transcript_lines(&messages, 80);
        let texts: Vec<String> = lines.iter().map(line_text).collect();

        assert_eq!(texts[0], "Counsel: First point.");
        assert_eq!(texts[1], "         Second point.");
    }

    #[test]
    fn empty_content_still_names_the_author() {
        let messages = vec![ChatMessage::assistant("", Vec::new())];

        let lines = transcript_lines(&messages, 80);
        assert_eq!(line_text(&lines[0]), "Counsel: ");
    }

    #[test]
    fn collapsed_disclosure_shows_source_count() {
        let mut message = ChatMessage::assistant(
            "Answer.",
            vec![
                citation("IPC", "302", "one"),
                citation("CrPC", "438", "two"),
            ],
        );
        message.sources_expanded = false;

        let lines = transcript_lines(&[message], 80);
        let texts: Vec<String> = lines.iter().map(line_text).collect();

        assert!(texts.contains(&"  View 2 sources (Tab)".to_string()));
        assert!(!texts.iter().any(|t| t.contains("IPC")));
    }

    #[test]
    fn expanded_disclosure_lists_citations() {
        let mut message = ChatMessage::assistant(
            "Answer.",
            vec![citation("IPC", "302", "Punishment for murder.")],
        );
        message.sources_expanded = true;

        let lines = transcript_lines(&[message], 80);
        let texts: Vec<String> = lines.iter().map(line_text).collect();

        assert!(texts.contains(&"  Hide sources (Tab)".to_string()));
        assert!(texts.contains(&"  \u{2022} Act: IPC, Section: 302".to_string()));
        assert!(texts.contains(&"    Page N/A of 1".to_string()));
        assert!(texts.contains(&"    Punishment for murder.".to_string()));
    }

    #[test]
    fn expanded_disclosure_truncates_long_content() {
        let mut message =
            ChatMessage::assistant("Answer.", vec![citation("IPC", "302", &"x".repeat(500))]);
        message.sources_expanded = true;

        // Wide enough that the preview fits on one line.
        let lines = transcript_lines(&[message], 400);
        let texts: Vec<String> = lines.iter().map(line_text).collect();

        let body = texts
            .iter()
            .find(|t| t.contains("xxx"))
            .expect("preview line present");
        assert!(body.ends_with("..."));
        assert_eq!(body.trim().chars().count(), 153);
    }

    #[test]
    fn user_messages_never_show_a_disclosure() {
        // Sources on a user message would be a bug upstream; the
        // renderer ignores them either way.
        let mut message = ChatMessage::user("question");
        message.sources = vec![citation("IPC", "302", "content")];

        let lines = transcript_lines(&[message], 80);
        assert!(!lines.iter().map(line_text).any(|t| t.contains("sources (Tab)")));
    }

    #[test]
    fn empty_state_introduces_the_app() {
        let lines = empty_state_lines();
        assert_eq!(line_text(&lines[0]), "Counsel");
        assert_eq!(
            line_text(&lines[2]),
            "Ask any legal question to get started."
        );
    }

    #[test]
    fn status_line_tracks_turn_state() {
        assert!(line_text(&status_line(false, 0)).contains("Enter send"));
        assert_eq!(line_text(&status_line(true, 0)), "Counsel is thinking");
        assert_eq!(line_text(&status_line(true, 3)), "Counsel is thinking...");
    }

    #[test]
    fn input_tail_passes_short_input_through() {
        assert_eq!(input_tail("short question", 40), "short question");
        assert_eq!(input_tail("", 40), "");
    }

    #[test]
    fn input_tail_keeps_the_newest_end() {
        assert_eq!(input_tail("abcdefgh", 4), "efgh");
    }

    #[test]
    fn input_tail_counts_cells_not_chars() {
        // CJK characters occupy two cells each, so a budget of 5
        // fits only two of them.
        let input = "\u{5B57}\u{5B57}\u{5B57}\u{5B57}";
        assert_eq!(input_tail(input, 5), "\u{5B57}\u{5B57}");
    }
}
