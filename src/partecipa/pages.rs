//! Server-rendered pages. The portal is a handful of small forms, so the
//! markup is built inline instead of pulling in a template engine.

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>{title}</title></head>\n<body>\n{body}\n</body>\n</html>\n"
    )
}

fn flash(message: Option<&str>) -> String {
    message
        .map(|m| format!("<p class=\"flash\">{}</p>\n", escape_html(m)))
        .unwrap_or_default()
}

#[must_use]
pub fn login(message: Option<&str>) -> String {
    let body = format!(
        "{}<h1>Participant login</h1>\n\
         <form method=\"post\" action=\"/\">\n\
         <label>Participant id <input type=\"text\" name=\"username\"></label>\n\
         <label>Password <input type=\"password\" name=\"password\"></label>\n\
         <button type=\"submit\">Log in</button>\n\
         </form>\n\
         <p><a href=\"/register\">Register</a></p>",
        flash(message)
    );
    layout("Login", &body)
}

#[must_use]
pub fn register(message: Option<&str>) -> String {
    let body = format!(
        "{}<h1>Register</h1>\n\
         <form method=\"post\" action=\"/register\">\n\
         <label>Participant id <input type=\"text\" name=\"username\"></label>\n\
         <label>Password <input type=\"password\" name=\"password\"></label>\n\
         <label>Phone number <input type=\"tel\" name=\"phone_no\"></label>\n\
         <button type=\"submit\">Register</button>\n\
         </form>\n\
         <p><a href=\"/\">Home</a></p>",
        flash(message)
    );
    layout("Register", &body)
}

/// Verification instructions: the token to text and the number to text it
/// to. Rendered without a token when there is no registered session user.
#[must_use]
pub fn verify(token: Option<&str>, phone_no: &str) -> String {
    let instructions = match token {
        Some(token) => format!(
            "<p>Text <code>{}</code> to <code>{}</code> to verify your account.</p>",
            escape_html(token),
            escape_html(phone_no)
        ),
        None => "<p>No verification token. Register first.</p>".to_string(),
    };
    let body = format!(
        "<h1>Verify your account</h1>\n{instructions}\n<p><a href=\"/\">Home</a></p>"
    );
    layout("Verify", &body)
}

/// The reset form keeps the token in a hidden input and only asks for the
/// new password.
#[must_use]
pub fn reset(token: &str) -> String {
    let body = format!(
        "<h1>Reset password</h1>\n\
         <form method=\"post\" action=\"/reset\">\n\
         <input type=\"hidden\" name=\"token\" value=\"{}\">\n\
         <label>New password <input type=\"password\" name=\"password\"></label>\n\
         <button type=\"submit\">Reset</button>\n\
         </form>",
        escape_html(token)
    );
    layout("Reset password", &body)
}

#[must_use]
pub fn secure(username: &str) -> String {
    let body = format!(
        "<h1>Welcome {}</h1>\n<p>You are logged in.</p>\n<p><a href=\"/logout\">Log out</a></p>",
        escape_html(username)
    );
    layout("Secure", &body)
}

fn escape_html(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '&' => "&amp;".to_string(),
            '<' => "&lt;".to_string(),
            '>' => "&gt;".to_string(),
            '"' => "&quot;".to_string(),
            '\'' => "&#39;".to_string(),
            _ => c.to_string(),
        })
        .collect()
}
