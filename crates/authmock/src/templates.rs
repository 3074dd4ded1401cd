//! HTML for the mock login page.

/// Escape HTML special characters to prevent XSS.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Render the login form with `csrf_token` embedded.
///
/// The inline script posts `{name, email}` as JSON to `/login`, echoing the
/// current `XSRF-TOKEN` cookie (or the embedded token when the cookie is
/// unreadable) in the `X-XSRF-TOKEN` header, then follows the returned
/// redirect.
pub fn login_page(csrf_token: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>Mock Sign In (DEV ONLY)</title>
    <meta name="csrf-token" content="{csrf_token}" />
    <style>
        body {{
            font-family: -apple-system, BlinkMacSystemFont, sans-serif;
            max-width: 400px;
            margin: 100px auto;
            padding: 20px;
        }}
        .warning {{
            background: #fff3cd;
            border: 1px solid #ffc107;
            padding: 15px;
            border-radius: 8px;
            margin-bottom: 20px;
        }}
        .warning h2 {{
            color: #856404;
            margin-top: 0;
        }}
        form {{
            background: #f8f9fa;
            padding: 20px;
            border-radius: 8px;
        }}
        label {{
            display: block;
            margin-bottom: 5px;
            font-weight: 500;
        }}
        input[type="email"], input[type="text"] {{
            width: 100%;
            padding: 10px;
            margin-bottom: 15px;
            border: 1px solid #ced4da;
            border-radius: 4px;
            box-sizing: border-box;
        }}
        button {{
            width: 100%;
            padding: 12px;
            background: #007bff;
            color: white;
            border: none;
            border-radius: 4px;
            cursor: pointer;
            font-size: 16px;
        }}
        button:hover {{
            background: #0056b3;
        }}
        #errors {{
            color: #b00020;
        }}
    </style>
</head>
<body>
    <div class="warning">
        <h2>Development Only</h2>
        <p>This is a <strong>mock login</strong>. No password is checked.</p>
        <p>Enter any name and email address to receive a token.</p>
    </div>

    <form id="login" action="/login" method="POST">
        <label for="name">Name</label>
        <input type="text" id="name" name="name" placeholder="Dev User" required />

        <label for="email">Email Address</label>
        <input type="email" id="email" name="email" placeholder="dev@example.com" required />

        <ul id="errors"></ul>

        <button type="submit">Sign in</button>
    </form>

    <script>
        function xsrfToken() {{
            var match = document.cookie.match(/(?:^|;\s*)XSRF-TOKEN=([^;]*)/);
            if (match) {{
                return decodeURIComponent(match[1]);
            }}
            return document.querySelector('meta[name="csrf-token"]').content;
        }}

        document.getElementById('login').addEventListener('submit', function (event) {{
            event.preventDefault();
            var form = event.target;
            var errors = document.getElementById('errors');
            errors.innerHTML = '';

            fetch(form.action, {{
                method: 'POST',
                credentials: 'same-origin',
                headers: {{
                    'Accept': 'application/json',
                    'Content-Type': 'application/json',
                    'X-XSRF-TOKEN': xsrfToken()
                }},
                body: JSON.stringify({{
                    name: form.name.value,
                    email: form.email.value
                }})
            }})
                .then(function (response) {{ return response.json(); }})
                .then(function (body) {{
                    if (body.success) {{
                        window.location.assign(body.redirect);
                        return;
                    }}
                    (body.validationErrors || [{{ msg: body.error }}]).forEach(function (err) {{
                        var item = document.createElement('li');
                        item.textContent = err.param ? err.param + ': ' + err.msg : err.msg;
                        errors.appendChild(item);
                    }});
                }});
        }});
    </script>
</body>
</html>"#,
        csrf_token = html_escape(csrf_token),
    )
}
