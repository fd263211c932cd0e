use axum::response::Html;
use maud::{DOCTYPE, Markup, PreEscaped, html};

use crate::schedule::ScheduleDetail;
use crate::types::{Candidate, Schedule, User};

const CELL_SCRIPT: &str = r#"
document.querySelectorAll('button.availability-toggle').forEach((button) => {
  button.addEventListener('click', async () => {
    const { scheduleId, userId, candidateId, availability } = button.dataset;
    const next = (Number(availability) + 1) % 3;
    const res = await fetch(`/schedules/${scheduleId}/users/${userId}/candidates/${candidateId}`, {
      method: 'POST',
      headers: { 'Content-Type': 'application/json' },
      body: JSON.stringify({ availability: next }),
    });
    if (res.ok) {
      const data = await res.json();
      button.dataset.availability = data.availability;
      button.textContent = ['No', '?', 'Yes'][data.availability];
    }
  });
});
document.querySelectorAll('form.comment-form').forEach((form) => {
  form.addEventListener('submit', async (event) => {
    event.preventDefault();
    const res = await fetch(form.action, {
      method: 'POST',
      headers: { 'Content-Type': 'application/json' },
      body: JSON.stringify({ comment: form.comment.value }),
    });
    if (res.ok) {
      const data = await res.json();
      form.comment.value = data.comment;
    }
  });
});
"#;

fn layout(title: &str, user: Option<&User>, body: Markup) -> Html<String> {
    let markup = html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) " | Arranger" }
            }
            body {
                nav {
                    a href="/" { "Arranger" }
                    @if let Some(user) = user {
                        " "
                        span.username { (user.username) }
                        " "
                        a href="/logout" { "Log out" }
                    } @else {
                        " "
                        a href="/login" { "Log in" }
                    }
                }
                main { (body) }
            }
        }
    };
    Html(markup.into_string())
}

fn multiline(text: &str) -> Markup {
    html! {
        @for (i, line) in text.lines().enumerate() {
            @if i > 0 { br; }
            (line)
        }
    }
}

pub fn index_page(user: Option<&User>, schedules: &[Schedule]) -> Html<String> {
    let body = html! {
        h1 { "Arranger" }
        p { "Propose a few dates, let everyone mark what works." }
        @if user.is_some() {
            p { a href="/schedules/new" { "Create a schedule" } }
            @if !schedules.is_empty() {
                h2 { "Your schedules" }
                table {
                    tr { th { "Name" } th { "Updated" } }
                    @for schedule in schedules {
                        tr {
                            td {
                                a href={ "/schedules/" (schedule.schedule_id) } {
                                    (schedule.schedule_name)
                                }
                            }
                            td { (schedule.updated_at.format("%Y/%m/%d %H:%M").to_string()) }
                        }
                    }
                }
            }
        } @else {
            p { a href="/login" { "Log in to create a schedule" } }
        }
    };
    layout("Home", user, body)
}

pub fn login_page(user: Option<&User>, login_url: &str, from: Option<&str>) -> Html<String> {
    let href = match from {
        Some(from) => format!("{login_url}?from={}", urlencoding::encode(from)),
        None => login_url.to_string(),
    };
    let body = html! {
        h1 { "Log in" }
        a href=(href) { "Log in with GitHub" }
        @if let Some(user) = user {
            p { "Logged in as " (user.username) }
        }
    };
    layout("Log in", user, body)
}

pub fn new_schedule_page(user: &User) -> Html<String> {
    let body = html! {
        h1 { "New schedule" }
        form method="post" action="/schedules" {
            (schedule_fields("", ""))
            label {
                "Candidates (one per line)"
                br;
                textarea name="candidates" rows="6" {}
            }
            button type="submit" { "Create" }
        }
    };
    layout("New schedule", Some(user), body)
}

pub fn edit_schedule_page(
    user: &User,
    schedule: &Schedule,
    candidates: &[Candidate],
) -> Html<String> {
    let action = format!("/schedules/{}", schedule.schedule_id);
    let body = html! {
        h1 { "Edit schedule" }
        form method="post" action={ (action) "?edit=1" } {
            (schedule_fields(&schedule.schedule_name, &schedule.memo))
            p { "Existing candidates" }
            ul {
                @for candidate in candidates {
                    li { (candidate.candidate_name) }
                }
            }
            label {
                "Add candidates (one per line)"
                br;
                textarea name="candidates" rows="4" {}
            }
            button type="submit" { "Save" }
        }
        h2 { "Danger zone" }
        form method="post" action={ (action) "?delete=1" } {
            button type="submit" { "Delete this schedule" }
        }
    };
    layout("Edit schedule", Some(user), body)
}

fn schedule_fields(name: &str, memo: &str) -> Markup {
    html! {
        label {
            "Name"
            br;
            input type="text" name="scheduleName" value=(name) required;
        }
        br;
        label {
            "Memo"
            br;
            textarea name="memo" rows="4" { (memo) }
        }
        br;
    }
}

pub fn schedule_page(viewer: &User, detail: &ScheduleDetail) -> Html<String> {
    let schedule = &detail.schedule;
    let body = html! {
        h1 { (schedule.schedule_name) }
        p.memo { (multiline(&schedule.memo)) }
        p {
            "Created by "
            @if let Some(creator) = &detail.creator {
                (creator.username)
            } @else {
                "unknown"
            }
        }
        @if detail.viewer_is_creator {
            p { a href={ "/schedules/" (schedule.schedule_id) "/edit" } { "Edit" } }
        }
        table.availabilities {
            tr {
                th { "Candidate" }
                @for row in &detail.rows {
                    th { (row.user.username) }
                }
            }
            @for (index, candidate) in detail.candidates.iter().enumerate() {
                tr {
                    th { (candidate.candidate_name) }
                    @for row in &detail.rows {
                        @if let Some((candidate_id, level)) = row.cells.get(index) {
                            td {
                                @if row.is_viewer {
                                    button.availability-toggle
                                        data-schedule-id=(schedule.schedule_id)
                                        data-user-id=(row.user.user_id)
                                        data-candidate-id=(candidate_id)
                                        data-availability=(level.ordinal())
                                    { (level.label()) }
                                } @else {
                                    (level.label())
                                }
                            }
                        }
                    }
                }
            }
            tr {
                th { "Comment" }
                @for row in &detail.rows {
                    td {
                        @if row.is_viewer {
                            form.comment-form method="post"
                                action={ "/schedules/" (schedule.schedule_id) "/users/" (viewer.user_id) "/comments" }
                            {
                                input type="text" name="comment" value=(row.comment);
                                button type="submit" { "Save" }
                            }
                        } @else {
                            (row.comment)
                        }
                    }
                }
            }
        }
        script { (PreEscaped(CELL_SCRIPT)) }
    };
    layout(&schedule.schedule_name, Some(viewer), body)
}
