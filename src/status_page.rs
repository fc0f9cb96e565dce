//! Static HTML status page served on `GET /`.

use cleanse_core::API_VERSION;

/// Path of the cleanse endpoint, as advertised on the page.
pub const CLEANSE_PATH: &str = "/api/v1/cleanse";

const TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Contact Cleanse API | Status</title>
    <style>
        @keyframes pulse-green {
            0% { box-shadow: 0 0 0 0 rgba(34, 197, 94, 0.7); }
            70% { box-shadow: 0 0 0 10px rgba(34, 197, 94, 0); }
            100% { box-shadow: 0 0 0 0 rgba(34, 197, 94, 0); }
        }
        body { margin: 0; min-height: 100vh; display: flex; align-items: center; justify-content: center;
               background: #020617; color: #e2e8f0; font-family: system-ui, sans-serif; }
        .card { width: 100%; max-width: 28rem; padding: 2rem; background: #0f172a;
                border: 1px solid #1e293b; border-radius: 1rem; }
        .live { display: inline-flex; align-items: center; gap: .5rem; padding: .25rem .75rem;
                background: #1e293b; border: 1px solid #334155; border-radius: 9999px;
                font-size: .75rem; font-weight: 700; letter-spacing: .05em; text-transform: uppercase; color: #4ade80; }
        .dot { width: .625rem; height: .625rem; border-radius: 9999px; background: #22c55e;
               animation: pulse-green 2s infinite; }
        h1 { margin: 1.5rem 0 .5rem; font-size: 1.5rem; color: #fff; }
        p { margin: 0 0 1.5rem; color: #94a3b8; line-height: 1.6; }
        dl { margin: 0; font-size: .875rem; }
        .row { display: flex; justify-content: space-between; padding: .5rem 0; border-bottom: 1px solid #1e293b; }
        .row:last-child { border-bottom: none; }
        dt { color: #64748b; }
        dd { margin: 0; color: #cbd5e1; }
        code { color: #60a5fa; }
    </style>
</head>
<body>
    <main class="card">
        <span class="live"><span class="dot"></span>System Live</span>
        <h1>Contact Cleanse API</h1>
        <p>Name, email and phone number standardization for contact records.</p>
        <dl>
            <div class="row"><dt>Endpoint</dt><dd><code>POST {endpoint}</code></dd></div>
            <div class="row"><dt>Version</dt><dd>{version}</dd></div>
            <div class="row"><dt>Environment</dt><dd>{environment}</dd></div>
        </dl>
    </main>
</body>
</html>
"#;

/// Render the status page for the given environment label.
#[must_use]
pub fn render(environment: &str) -> String {
    TEMPLATE
        .replace("{endpoint}", CLEANSE_PATH)
        .replace("{version}", API_VERSION)
        .replace("{environment}", &escape_html(environment))
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
