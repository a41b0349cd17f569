//! Server-rendered HTML. Every user-controlled value goes through
//! `html_escape` before it reaches the page.

use std::fmt::Write;

use axum::response::Html;
use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};

use crate::{auth::dto::SessionUser, content::SITE, flash::Notice};

/// Values echoed back into the register form after a rejected submit.
#[derive(Debug, Default)]
pub struct RegisterPrefill {
    pub username: String,
    pub email: String,
    pub full_name: String,
}

fn layout(title: &str, user: Option<&SessionUser>, notice: Option<Notice>, body: &str) -> Html<String> {
    let mut out = String::with_capacity(2048);
    let _ = write!(
        out,
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{} | {}</title>\n</head>\n<body>\n<nav>\n<a href=\"/\">Home</a>\n",
        text(title),
        text(SITE.site_title)
    );
    match user {
        Some(u) => {
            let _ = write!(
                out,
                "<a href=\"/profile\">{}</a>\n<a href=\"/logout\">Log out</a>\n",
                text(&u.username)
            );
        }
        None => out.push_str("<a href=\"/login\">Log in</a>\n<a href=\"/register\">Register</a>\n"),
    }
    out.push_str("</nav>\n");
    if let Some(n) = notice {
        let _ = write!(
            out,
            "<div class=\"flash flash-{}\">{}</div>\n",
            n.level().as_str(),
            text(n.message())
        );
    }
    let _ = write!(out, "<main>\n{}</main>\n</body>\n</html>\n", body);
    Html(out)
}

pub fn home(user: Option<&SessionUser>, notice: Option<Notice>) -> Html<String> {
    let mut body = String::new();
    let _ = write!(
        body,
        "<h1>{}</h1>\n<p>{}</p>\n<section id=\"about\">\n<h2>{}</h2>\n<p>{}</p>\n</section>\n",
        text(SITE.site_title),
        text(SITE.description),
        text(SITE.about.title),
        text(SITE.about.content)
    );

    let _ = write!(body, "<section id=\"why-learn\">\n<h2>{}</h2>\n", text(SITE.why_learn_title));
    for r in SITE.reasons {
        let _ = write!(body, "<h3>{}</h3>\n<p>{}</p>\n", text(r.title), text(r.content));
    }
    body.push_str("</section>\n");

    let _ = write!(body, "<section id=\"usage\">\n<h2>{}</h2>\n", text(SITE.usage_title));
    for a in SITE.areas {
        let _ = write!(
            body,
            "<h3>{}</h3>\n<p>{}</p>\n<p>{}</p>\n",
            text(a.name),
            text(a.description),
            text(&a.frameworks.join(", "))
        );
    }
    body.push_str("</section>\n");

    let _ = write!(
        body,
        "<section id=\"getting-started\">\n<h2>{}</h2>\n<ol>\n",
        text(SITE.getting_started_title)
    );
    for s in SITE.steps {
        let _ = write!(body, "<li><strong>{}</strong> {}</li>\n", text(s.title), text(s.content));
    }
    body.push_str("</ol>\n</section>\n");

    let _ = write!(body, "<section id=\"resources\">\n<h2>{}</h2>\n<ul>\n", text(SITE.resources_title));
    for l in SITE.links {
        let _ = write!(body, "<li><a href=\"{}\">{}</a></li>\n", attr(l.url), text(l.name));
    }
    body.push_str("</ul>\n</section>\n");

    layout("Home", user, notice, &body)
}

pub fn register_form(notice: Option<Notice>, prefill: &RegisterPrefill) -> Html<String> {
    let body = format!(
        "<h1>Register</h1>\n<form method=\"post\" action=\"/register\">\n\
         <label>Username <input name=\"username\" required value=\"{}\"></label>\n\
         <label>Email <input name=\"email\" type=\"email\" required value=\"{}\"></label>\n\
         <label>Password <input name=\"password\" type=\"password\" required></label>\n\
         <label>Full name <input name=\"full_name\" value=\"{}\"></label>\n\
         <button type=\"submit\">Register</button>\n</form>\n\
         <p>Already registered? <a href=\"/login\">Log in</a></p>\n",
        attr(&prefill.username),
        attr(&prefill.email),
        attr(&prefill.full_name)
    );
    layout("Register", None, notice, &body)
}

pub fn login_form(notice: Option<Notice>, username: &str) -> Html<String> {
    let body = format!(
        "<h1>Log in</h1>\n<form method=\"post\" action=\"/login\">\n\
         <label>Username <input name=\"username\" required value=\"{}\"></label>\n\
         <label>Password <input name=\"password\" type=\"password\" required></label>\n\
         <button type=\"submit\">Log in</button>\n</form>\n\
         <p>No account yet? <a href=\"/register\">Register</a></p>\n",
        attr(username)
    );
    layout("Log in", None, notice, &body)
}

pub fn profile(user: &SessionUser, notice: Option<Notice>) -> Html<String> {
    let body = format!(
        "<h1>Profile</h1>\n<dl>\n\
         <dt>Username</dt><dd id=\"username\">{}</dd>\n\
         <dt>Email</dt><dd id=\"email\">{}</dd>\n\
         <dt>Full name</dt><dd id=\"full_name\">{}</dd>\n\
         <dt>About</dt><dd id=\"bio\">{}</dd>\n</dl>\n\
         <p><a href=\"/update_profile\">Edit profile</a></p>\n",
        text(&user.username),
        text(&user.email),
        text(user.full_name.as_deref().unwrap_or("")),
        text(user.bio.as_deref().unwrap_or(""))
    );
    layout("Profile", Some(user), notice, &body)
}

pub fn update_profile_form(user: &SessionUser, notice: Option<Notice>) -> Html<String> {
    let body = format!(
        "<h1>Edit profile</h1>\n<form method=\"post\" action=\"/update_profile\">\n\
         <label>Full name <input name=\"full_name\" value=\"{}\"></label>\n\
         <label>About <textarea name=\"bio\">{}</textarea></label>\n\
         <button type=\"submit\">Save</button>\n</form>\n",
        attr(user.full_name.as_deref().unwrap_or("")),
        text(user.bio.as_deref().unwrap_or(""))
    );
    layout("Edit profile", Some(user), notice, &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> SessionUser {
        SessionUser {
            id: 1,
            username: "<b>alice</b>".into(),
            email: "alice@example.com".into(),
            full_name: Some("Alice \"A\"".into()),
            bio: Some("<script>x</script>".into()),
        }
    }

    #[test]
    fn profile_escapes_user_values() {
        let Html(page) = profile(&user(), None);
        assert!(page.contains("&lt;b&gt;alice&lt;/b&gt;"));
        assert!(page.contains("&lt;script&gt;x&lt;/script&gt;"));
        assert!(!page.contains("<script>"));
    }

    #[test]
    fn update_form_prefills_from_session() {
        let Html(page) = update_profile_form(&user(), None);
        assert!(page.contains("value=\"Alice &quot;A&quot;\""));
        assert!(page.contains("action=\"/update_profile\""));
    }

    #[test]
    fn notice_is_rendered_with_level() {
        let Html(page) = login_form(Some(Notice::InvalidCredentials), "bob");
        assert!(page.contains("flash-error"));
        assert!(page.contains(&*text(Notice::InvalidCredentials.message())));
        assert!(page.contains("value=\"bob\""));
    }

    #[test]
    fn register_form_never_echoes_password() {
        let prefill = RegisterPrefill {
            username: "bob".into(),
            email: "bob@example.com".into(),
            full_name: String::new(),
        };
        let Html(page) = register_form(Some(Notice::DuplicateAccount), &prefill);
        assert!(page.contains("value=\"bob@example.com\""));
        assert!(page.contains("type=\"password\" required>"));
    }

    #[test]
    fn home_lists_content_and_nav_for_visitor() {
        let Html(page) = home(None, Some(Notice::LoggedOut));
        assert!(page.contains("What is Python?"));
        assert!(page.contains("href=\"/register\""));
        assert!(page.contains("flash-info"));
    }
}
