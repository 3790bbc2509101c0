//! Admin Routes - SpaceAPI settings form
//!
//! One input per registry entry, in registry order. Submitting the form
//! stores each value under its descriptor's storage name. Stored values are
//! HTML-attribute-escaped here and nowhere else. Posts whose `Origin` or
//! `Referer` names another host are refused.

use axum::{
    extract::{Form, Query, Request, State},
    http::{header, HeaderMap, StatusCode, Uri},
    middleware::{self, Next},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Deserialize;
use spaceapi_core::{FieldRenderer, OptionDescriptor};
use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::WebError;
use crate::spaceapi::redirect_to;
use crate::state::AppState;

/// Absolute path of the settings page
pub const SETTINGS_PATH: &str = "/admin/settings";

/// User name expected in Basic credentials
pub const ADMIN_USER: &str = "admin";

const REALM: &str = "Basic realm=\"spaceapi-admin\"";

pub fn create_admin_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/settings", get(settings_page).post(save_settings))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin))
        .with_state(state)
}

#[derive(Debug, Default, Deserialize)]
pub struct SettingsPageQuery {
    #[serde(rename = "settings-updated")]
    pub settings_updated: Option<String>,
}

/// GET /admin/settings
async fn settings_page(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SettingsPageQuery>,
) -> Result<Html<String>, WebError> {
    let mut fields = Vec::with_capacity(state.registry.len());
    for descriptor in state.registry.iter() {
        let value = state
            .registry
            .current_value(state.store.as_ref(), &descriptor.key)
            .await?;
        fields.push((descriptor, value));
    }

    let saved = query.settings_updated.as_deref() == Some("true");
    Ok(Html(render_settings_page(&state.config.settings_page, &fields, saved)))
}

/// POST /admin/settings
async fn save_settings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> Result<Response, WebError> {
    if !is_same_origin(&headers) {
        warn!(
            "Rejected cross-origin settings form from {:?}",
            headers.get(header::ORIGIN).or_else(|| headers.get(header::REFERER))
        );
        return Ok((StatusCode::FORBIDDEN, "Cross-origin form submission rejected").into_response());
    }

    let mut saved = 0;
    for descriptor in state.registry.iter() {
        if let Some(value) = form.get(&descriptor.storage_name) {
            state.store.set(&descriptor.storage_name, value).await?;
            saved += 1;
        }
    }

    info!("Saved {} SpaceAPI settings", saved);
    Ok(redirect_to(&format!("{}?settings-updated=true", SETTINGS_PATH)))
}

/// Basic-auth gate, active only when an admin password is configured
async fn require_admin(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let Some(password) = state.config.admin_password.as_deref() else {
        return next.run(request).await;
    };

    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(|value| basic_credentials_match(value, ADMIN_USER, password))
        .unwrap_or(false);

    if authorized {
        next.run(request).await
    } else {
        warn!("Rejected unauthenticated admin request to {}", request.uri());
        (
            StatusCode::UNAUTHORIZED,
            [(header::WWW_AUTHENTICATE, REALM)],
            "Authentication required",
        )
            .into_response()
    }
}

/// Whether a form post was sent by a page on this host.
///
/// Browsers attach `Origin` (or at least `Referer`) to form posts, and its
/// authority must equal `Host`. Requests carrying neither header, such as
/// command-line clients, are accepted.
pub fn is_same_origin(headers: &HeaderMap) -> bool {
    let Some(source) = headers
        .get(header::ORIGIN)
        .or_else(|| headers.get(header::REFERER))
    else {
        return true;
    };
    let Some(host) = headers.get(header::HOST).and_then(|h| h.to_str().ok()) else {
        return false;
    };

    source
        .to_str()
        .ok()
        .and_then(|value| value.parse::<Uri>().ok())
        .and_then(|uri| {
            uri.authority()
                .map(|authority| authority.as_str().eq_ignore_ascii_case(host))
        })
        .unwrap_or(false)
}

fn basic_credentials_match(header_value: &str, user: &str, password: &str) -> bool {
    let Some(encoded) = header_value.strip_prefix("Basic ") else {
        return false;
    };
    let Ok(decoded) = STANDARD.decode(encoded.trim()) else {
        return false;
    };
    let Ok(credentials) = String::from_utf8(decoded) else {
        return false;
    };
    credentials
        .split_once(':')
        .map(|(u, p)| u == user && p == password)
        .unwrap_or(false)
}

/// Escape text for use inside an HTML attribute or element body
pub fn escape_attr(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Input element for one option, with its current value already escaped
pub fn render_field(descriptor: &OptionDescriptor, value: &str) -> String {
    let name = escape_attr(&descriptor.storage_name);
    let value = escape_attr(value);

    match descriptor.renderer {
        FieldRenderer::Text => format!(
            "<input type='text' id='{name}' name='{name}' value='{value}' class='regular-text' />"
        ),
        FieldRenderer::Url => format!(
            "<input type='url' id='{name}' name='{name}' value='{value}' class='regular-text' />"
        ),
        FieldRenderer::Coordinate => format!(
            "<input type='text' id='{name}' name='{name}' value='{value}' inputmode='decimal' />"
        ),
        FieldRenderer::CommaList => format!(
            "<input type='text' id='{name}' name='{name}' value='{value}' class='regular-text' placeholder='email,irc,twitter' />"
        ),
    }
}

pub fn render_settings_page(
    settings_page: &str,
    fields: &[(&OptionDescriptor, String)],
    saved: bool,
) -> String {
    let mut rows = String::new();
    for (descriptor, value) in fields {
        let _ = writeln!(
            rows,
            "<tr><th scope='row'><label for='{}'>{}</label></th><td>{}</td></tr>",
            escape_attr(&descriptor.storage_name),
            escape_attr(&descriptor.label),
            render_field(descriptor, value),
        );
    }

    let notice = if saved {
        "<div class='updated fade'><p><strong>Space API Settings saved!</strong></p></div>\n"
    } else {
        ""
    };

    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>Space API Settings</title></head>
<body>
<div class="wrap">
{notice}<h2>Space API Settings</h2>
<div id="{page}">
<p>SpaceAPI Settings Section</p>
<form method="post" action="{action}">
<table class="form-table">
{rows}</table>
<p class="submit"><input type="submit" name="submit" id="submit" class="button button-primary" value="Save Changes" /></p>
</form>
</div>
</div>
</body>
</html>
"#,
        notice = notice,
        page = escape_attr(settings_page),
        action = SETTINGS_PATH,
        rows = rows,
    )
}
