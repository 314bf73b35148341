use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use chrono::Utc;
use graduation_vaults::{
    api,
    dashboard::{render, DashboardState, Snapshot, UiEvent},
    models::*,
    summarize, Config, VaultAggregator,
};
use http_body_util::BodyExt;
use std::sync::Arc;
use tower::ServiceExt;

fn proxy_app() -> Router {
    api::create_router(api::AppState {
        aggregator: VaultAggregator::from_config(&Config::default()),
    })
}

async fn send(router: &Router, method: Method, path: &str) -> Response {
    let req = Request::builder()
        .method(method)
        .uri(path)
        .header(header::ORIGIN, "https://dashboard.example")
        .body(Body::empty())
        .unwrap();
    router.clone().oneshot(req).await.unwrap()
}

async fn body_bytes(resp: Response) -> Vec<u8> {
    resp.into_body().collect().await.unwrap().to_bytes().to_vec()
}

fn allow_origin(resp: &Response) -> Option<&str> {
    resp.headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .and_then(|v| v.to_str().ok())
}

#[cfg(test)]
mod cors_tests {
    use super::*;

    #[tokio::test]
    async fn test_preflight_on_any_path() {
        let app = proxy_app();

        for path in ["/api/vaults", "/api/poolSummary", "/api/unknown", "/"] {
            let resp = send(&app, Method::OPTIONS, path).await;
            assert!(
                resp.status() == StatusCode::OK || resp.status() == StatusCode::NO_CONTENT,
                "unexpected status {} for {}",
                resp.status(),
                path
            );
            assert_eq!(allow_origin(&resp), Some("*"));
            let methods = resp
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_METHODS)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string();
            assert!(methods.contains("GET"));
            assert!(body_bytes(resp).await.is_empty());
        }
    }

    #[tokio::test]
    async fn test_json_responses_allow_any_origin() {
        let app = proxy_app();
        for path in ["/api/vaults", "/api/poolSummary", "/api/vault/0x1"] {
            let resp = send(&app, Method::GET, path).await;
            assert_eq!(resp.status(), StatusCode::OK);
            assert_eq!(allow_origin(&resp), Some("*"));
            assert!(resp
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .starts_with("application/json"));
        }
    }

    #[tokio::test]
    async fn test_not_found_keeps_cors_headers() {
        let app = proxy_app();
        let resp = send(&app, Method::GET, "/admin").await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(allow_origin(&resp), Some("*"));
        assert_eq!(body_bytes(resp).await, b"Not found");
    }

    #[tokio::test]
    async fn test_write_methods_are_not_served() {
        let app = proxy_app();
        let resp = send(&app, Method::POST, "/api/vaults").await;
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}

#[cfg(test)]
mod rendering_safety_tests {
    use super::*;

    fn hostile_state() -> DashboardState {
        let student = Student {
            student_id: "GV-\"x\"".to_string(),
            display_name: "<script>alert(1)</script>".to_string(),
            grad_year: 2030,
        };
        let mut vault = Vault::for_student(&student, 1.0, 1.0, Utc::now());
        vault.safe_address = Some("0x<img src=x onerror=alert(1)>".to_string());
        vault.signers.parent_guardian = Some("<b>bold</b>".to_string());
        let summary = summarize(std::slice::from_ref(&vault), "<i>sync</i>".to_string());

        DashboardState::new(Arc::new(Snapshot {
            students: vec![student],
            vaults: vec![vault],
            summary,
        }))
    }

    #[test]
    fn test_grid_escapes_names() {
        let ui = hostile_state();
        let grid = render::render_vault_grid(&ui);
        assert!(!grid.contains("<script>"));
        assert!(grid.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(grid.contains(r#"href="/vault/GV-%22x%22""#));
        assert!(grid.contains(r#"data-vault="GV-&quot;x&quot;""#));
    }

    #[test]
    fn test_typeahead_and_summary_escape() {
        let mut ui = hostile_state();
        ui.handle(UiEvent::Input("script".to_string()));
        let items = render::render_typeahead_items(&ui);
        assert!(!items.contains("<script>"));
        assert!(render::render_summary(&ui).contains("&lt;i&gt;sync&lt;/i&gt;"));
    }

    #[test]
    fn test_panel_escapes_vault_fields() {
        let mut ui = hostile_state();
        ui.handle(UiEvent::OpenVault("GV-\"x\"".to_string()));

        let page = render::render_page(&ui);
        assert!(!page.contains("<img"));
        assert!(!page.contains("<b>bold</b>"));
        assert!(page.contains("&lt;b&gt;bold&lt;/b&gt;"));
        // Fragment is emitted as a JSON string literal inside the script.
        assert!(page.contains(r##""/#/vault/GV-\"x\"""##));
        assert!(page.contains(r#"data-copy="0x&lt;img src=x onerror=alert(1)&gt;""#));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            render::escape_html(r#"<a href="x">'&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;"
        );
    }
}
