//! Quiz screen for the client.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Padding, Paragraph, Wrap};

use crate::client::state::{ClientApp, Screen};
use crate::protocol::Verdict;

/// Render the quiz screen.
pub fn render(frame: &mut Frame, area: Rect, app: &ClientApp) {
    let Screen::Quiz {
        number,
        text,
        submitted,
    } = &app.screen
    else {
        return;
    };

    let columns = Layout::horizontal([Constraint::Min(40), Constraint::Length(24)])
        .margin(1)
        .split(area);

    let chunks = Layout::vertical([
        Constraint::Length(3), // Progress
        Constraint::Min(5),    // Question text
        Constraint::Length(3), // Answer input
        Constraint::Length(2), // Notice
        Constraint::Length(2), // Controls
    ])
    .split(columns[0]);

    render_progress(frame, chunks[0], *number, app.correct_count());
    render_question_text(frame, chunks[1], text);
    render_input(frame, chunks[2], &app.input, *submitted);
    render_notice(frame, chunks[3], app.notice.as_deref());
    render_controls(frame, chunks[4]);
    render_results_log(frame, columns[1], &app.results);
}

fn render_progress(frame: &mut Frame, area: Rect, number: usize, correct: usize) {
    let progress_text = format!("Question {}  ·  {} correct so far", number, correct);

    let widget = Paragraph::new(progress_text)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Cyan).bold());

    frame.render_widget(widget, area);
}

fn render_question_text(frame: &mut Frame, area: Rect, text: &str) {
    let widget = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(Color::White))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .padding(Padding::horizontal(1)),
        );

    frame.render_widget(widget, area);
}

fn render_input(frame: &mut Frame, area: Rect, input: &str, submitted: bool) {
    let (title, color) = if submitted {
        (" Waiting for result ", Color::DarkGray)
    } else {
        (" Your answer ", Color::Cyan)
    };

    let line = Line::from(vec![
        Span::styled(input, Style::default().fg(Color::Yellow)),
        Span::styled("_", Style::default().fg(Color::Yellow)),
    ]);

    let widget = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(title)
            .title_style(Style::default().fg(color))
            .padding(Padding::horizontal(1)),
    );

    frame.render_widget(widget, area);
}

fn render_notice(frame: &mut Frame, area: Rect, notice: Option<&str>) {
    let Some(notice) = notice else {
        return;
    };

    let widget = Paragraph::new(notice)
        .alignment(Alignment::Center)
        .fg(Color::Red);

    frame.render_widget(widget, area);
}

fn render_results_log(frame: &mut Frame, area: Rect, results: &[(usize, Verdict)]) {
    let lines: Vec<Line> = results
        .iter()
        .map(|(number, verdict)| {
            let color = match verdict {
                Verdict::Correct => Color::Green,
                Verdict::Incorrect => Color::Red,
            };

            Line::from(vec![
                Span::styled(format!("{:2}. ", number), Style::default().fg(Color::DarkGray)),
                Span::styled(verdict.as_str(), Style::default().fg(color)),
            ])
        })
        .collect();

    // Keep the newest results in view.
    let overflow = results.len().saturating_sub(area.height.saturating_sub(2) as usize);

    let widget = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(" Results ")
                .title_style(Style::default().fg(Color::Cyan))
                .padding(Padding::horizontal(1)),
        )
        .scroll((overflow as u16, 0));

    frame.render_widget(widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let widget = Paragraph::new("type your answer  ·  Enter to submit  ·  Esc to leave")
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);

    frame.render_widget(widget, area);
}
