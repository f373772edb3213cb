//! HTML and plain-text renderings of the magic-link email.

const BRAND_PRIMARY: &str = "#0b2f46";
const BRAND_ACCENT: &str = "#e0b13c";
const BG_SOFT: &str = "#f5f7fb";
const BORDER: &str = "#e6eef5";
const TEXT_MUTED: &str = "#5b6b7a";

pub(crate) fn magic_link_subject() -> String {
    "Sign in to Sesamo".to_string()
}

/// Escape text interpolated into HTML attributes or bodies.
fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

pub(crate) fn magic_link_html(
    link: &str,
    email: &str,
    minutes: i64,
    sandbox_note: Option<&str>,
) -> String {
    let sandbox_box = sandbox_note.map_or_else(String::new, |note| {
        format!(
            r#"<div style="margin-top:14px;padding:10px 12px;background:{BG_SOFT};border:1px dashed {BORDER};border-radius:8px;color:{TEXT_MUTED};font-size:13px;">{}</div>"#,
            escape_html(note)
        )
    });

    format!(
        r#"<!doctype html>
<html lang="en">
<head>
  <meta http-equiv="Content-Type" content="text/html; charset=utf-8" />
  <meta name="viewport" content="width=device-width,initial-scale=1" />
  <title>Sign in to Sesamo</title>
</head>
<body style="margin:0;background:{BG_SOFT};font-family:system-ui,-apple-system,Segoe UI,Roboto,Helvetica,Arial,sans-serif;color:#0b1a2b;">
  <table role="presentation" cellspacing="0" cellpadding="0" border="0" style="width:100%;padding:24px 0;">
    <tr>
      <td align="center">
        <table role="presentation" cellspacing="0" cellpadding="0" border="0" style="width:100%;max-width:640px;background:#fff;border:1px solid {BORDER};border-radius:12px;overflow:hidden;">
          <tr>
            <td style="background:{BRAND_PRIMARY};padding:18px 22px;">
              <div style="color:#fff;font-weight:700;font-size:18px;letter-spacing:.3px;">Sesamo</div>
              <div style="color:{BRAND_ACCENT};font-weight:700;font-size:22px;margin-top:4px;">One-click sign in</div>
            </td>
          </tr>
          <tr>
            <td style="padding:22px;font-size:15px;line-height:1.55;">
              <p>Hello,</p>
              <p>Use this button to sign in. The link expires in <strong>{minutes} minutes</strong>.</p>
              <div style="margin:18px 0;">
                <a href="{link}" style="display:inline-block;background:{BRAND_ACCENT};color:{BRAND_PRIMARY};text-decoration:none;font-weight:700;padding:12px 18px;border-radius:10px;">Sign in</a>
              </div>
              <div style="margin-top:14px;color:{TEXT_MUTED};font-size:13px;">Email: <strong>{escaped_email}</strong></div>
              <div style="margin-top:18px;color:{TEXT_MUTED};font-size:13px;">
                If the button does not work, copy and paste this link into your browser:<br>
                <a href="{link}" style="color:{BRAND_PRIMARY};text-decoration:underline;">{link}</a>
              </div>
              {sandbox_box}
            </td>
          </tr>
          <tr>
            <td style="padding:14px 22px;border-top:1px solid {BORDER};color:{TEXT_MUTED};font-size:12px;">
              You received this email because a sign-in link was requested for Sesamo.
            </td>
          </tr>
        </table>
      </td>
    </tr>
  </table>
</body>
</html>"#,
        escaped_email = escape_html(email),
    )
}

pub(crate) fn magic_link_text(
    link: &str,
    email: &str,
    minutes: i64,
    sandbox_note: Option<&str>,
) -> String {
    let extra = sandbox_note.map_or_else(String::new, |note| format!("\n\n[Sandbox] {note}"));
    format!(
        "[Sesamo] One-click sign in\nEmail: {email}\nThis link expires in {minutes} minutes.\n\n{link}{extra}"
    )
}
