//! HTML rendering for the dashboard.
//!
//! Rendering is a pure function of [`DashboardState`]; every interpolated
//! value goes through [`escape_html`].

use chrono::{DateTime, Local, Utc};
use std::fmt::Write;
use url::form_urlencoded::byte_serialize;

use super::state::DashboardState;
use crate::models::{Signers, Student, Vault, SIGNER_ROLES};

pub const PLACEHOLDER: &str = "—";
pub const LOCAL_TIME_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

/// How long the copy button reads "Copied" after a copy.
pub const COPY_FEEDBACK_MS: u64 = 1200;

/// `0x1111…1111` style abbreviation.
pub fn short_addr(address: Option<&str>) -> String {
    match address {
        Some(a) if !a.is_empty() => {
            let chars: Vec<char> = a.chars().collect();
            let head: String = chars.iter().take(6).collect();
            let tail: String = chars[chars.len().saturating_sub(4)..].iter().collect();
            format!("{}…{}", head, tail)
        }
        _ => PLACEHOLDER.to_string(),
    }
}

/// Thousands-grouped number with at most `max_fraction_digits` decimals and
/// no trailing zeros.
pub fn fmt_number(n: f64, max_fraction_digits: usize) -> String {
    if !n.is_finite() {
        return n.to_string();
    }

    // Half away from zero, like the browser's locale formatting.
    let scale = 10f64.powi(max_fraction_digits as i32);
    let rounded = (n.abs() * scale).round() / scale;
    let fixed = format!("{:.*}", max_fraction_digits, rounded);
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, f.trim_end_matches('0')),
        None => (fixed.as_str(), ""),
    };

    let mut out = String::with_capacity(fixed.len() + int_part.len() / 3 + 1);
    if n < 0.0 && (int_part.bytes().any(|b| b != b'0') || !frac_part.is_empty()) {
        out.push('-');
    }
    let len = int_part.len();
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}

pub fn usd(n: f64) -> String {
    format!("${}", fmt_number(n, 2))
}

pub fn local_time(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format(LOCAL_TIME_FORMAT).to_string()
}

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
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

/// Percent-encodes a query parameter value.
pub fn encode_query_value(value: &str) -> String {
    byte_serialize(value.as_bytes()).collect()
}

/// Percent-encodes a single path segment.
pub fn encode_path_segment(value: &str) -> String {
    // Form encoding writes spaces as `+`, which a path keeps literally.
    encode_query_value(value).replace('+', "%20")
}

/// JS string literal safe to embed inside a `<script>` element.
fn script_string(value: &str) -> String {
    serde_json::Value::String(value.to_string())
        .to_string()
        .replace("</", "<\\/")
}

/// Values shown in the summary bar.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryView {
    pub total_vaults: usize,
    pub total_balance: String,
    pub total_balance_usd: String,
    pub official_signers: String,
    pub last_sync: String,
}

pub fn summary_view(state: &DashboardState) -> SummaryView {
    let snapshot = state.snapshot();
    let summary = &snapshot.summary;

    SummaryView {
        total_vaults: summary.total_vaults.unwrap_or(snapshot.vaults.len()),
        total_balance: format!("{} POL", fmt_number(summary.total_pol, 2)),
        total_balance_usd: usd(summary.total_usd),
        // Always the standard set, whatever the source reports.
        official_signers: SIGNER_ROLES.join(" • "),
        last_sync: summary
            .last_sync
            .clone()
            .unwrap_or_else(|| PLACEHOLDER.to_string()),
    }
}

/// One card in the vault grid.
#[derive(Debug, Clone, PartialEq)]
pub struct VaultCard {
    pub student_id: String,
    pub label: String,
    pub address: String,
    pub balance: String,
    pub balance_usd: String,
    pub status: String,
    pub warn: bool,
}

pub fn vault_card(vault: &Vault) -> VaultCard {
    VaultCard {
        student_id: vault.student_id.clone(),
        label: format!("{} ({})", vault.display_name, vault.student_id),
        address: short_addr(vault.safe_address.as_deref()),
        balance: format!("{} POL", fmt_number(vault.pol_balance, 2)),
        balance_usd: usd(vault.usd_balance),
        status: vault.status.to_string(),
        warn: !vault.status.is_locked(),
    }
}

pub fn vault_cards(state: &DashboardState) -> Vec<VaultCard> {
    state.snapshot().vaults.iter().map(vault_card).collect()
}

pub fn render_summary(state: &DashboardState) -> String {
    let view = summary_view(state);
    format!(
        r#"<section class="summary">
  <div class="metric"><div class="k">Total Vaults</div><div id="totalVaults">{}</div></div>
  <div class="metric"><div class="k">Total Balance</div><div id="totalBalance">{}</div><div id="totalBalanceUsd">{}</div></div>
  <div class="metric"><div class="k">Official Signers</div><div id="officialSigners">{}</div></div>
  <div class="metric"><div class="k">Last Sync</div><div id="lastSync">{}</div></div>
</section>"#,
        view.total_vaults,
        escape_html(&view.total_balance),
        escape_html(&view.total_balance_usd),
        escape_html(&view.official_signers),
        escape_html(&view.last_sync),
    )
}

pub fn render_vault_grid(state: &DashboardState) -> String {
    let mut html = String::from(r#"<section id="vaultGrid" class="grid">"#);
    for card in vault_cards(state) {
        let _ = write!(
            html,
            r#"
  <div class="vault-card">
    <div class="vault-name">{}</div>
    <div class="vault-meta">{}</div>
    <div class="vault-balance">{}</div>
    <div class="vault-meta">{}</div>
    <div class="badge{}">{}</div>
    <a class="btn" href="/vault/{}" data-vault="{}">View Vault</a>
  </div>"#,
            escape_html(&card.label),
            escape_html(&card.address),
            escape_html(&card.balance),
            escape_html(&card.balance_usd),
            if card.warn { " warn" } else { "" },
            escape_html(&card.status),
            escape_html(&encode_path_segment(&card.student_id)),
            escape_html(&card.student_id),
        );
    }
    html.push_str("\n</section>");
    html
}

fn render_suggestion(student: &Student) -> String {
    format!(
        r#"<a class="typeahead-item" href="/?select={query}" data-vault="{id}" data-name="{name}"><div>{name}</div><div class="mono">{id}</div></a>"#,
        query = escape_html(&encode_query_value(&student.student_id)),
        id = escape_html(&student.student_id),
        name = escape_html(&student.display_name),
    )
}

/// Suggestion list items, empty when the list is hidden.
pub fn render_typeahead_items(state: &DashboardState) -> String {
    if !state.typeahead_visible() {
        return String::new();
    }
    state
        .suggestions()
        .iter()
        .map(render_suggestion)
        .collect::<Vec<_>>()
        .join("\n")
}

fn kv(key: &str, value: &str, mono: bool) -> String {
    format!(
        r#"<div class="kv"><div class="k">{}</div><div{}>{}</div></div>"#,
        escape_html(key),
        if mono { r#" class="mono""# } else { "" },
        escape_html(value)
    )
}

fn signer_or_placeholder(value: &Option<String>) -> &str {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .unwrap_or(PLACEHOLDER)
}

fn render_signers(signers: &Signers) -> String {
    [
        kv("Threshold", signers.threshold_or_default(), false),
        kv("Parent/Guardian", signer_or_placeholder(&signers.parent_guardian), true),
        kv("School Representative", signer_or_placeholder(&signers.school_rep), true),
        kv("Counselor/Staff", signer_or_placeholder(&signers.staff_or_counselor), true),
        kv("Independent Trustee", signer_or_placeholder(&signers.independent_trustee), true),
    ]
    .join("\n    ")
}

/// Detail panel body for the open vault, `None` while the panel is hidden.
pub fn render_panel(state: &DashboardState) -> Option<String> {
    state.open_vault().map(render_vault_panel)
}

/// Detail panel body for one vault.
pub fn render_vault_panel(vault: &Vault) -> String {
    let address = match vault.safe_address.as_deref().filter(|a| !a.is_empty()) {
        Some(a) => format!(
            r#"{a} <button class="btn mono" id="copyAddr" data-copy="{a}">Copy</button>"#,
            a = escape_html(a)
        ),
        None => PLACEHOLDER.to_string(),
    };
    let grad_year = vault
        .grad_year
        .map(|y| y.to_string())
        .unwrap_or_else(|| PLACEHOLDER.to_string());
    let last_activity = vault
        .last_activity
        .map(local_time)
        .unwrap_or_else(|| PLACEHOLDER.to_string());

    format!(
        r#"<h3>{name} <span class="mono">({id})</span></h3>
  <div class="mono">Safe: {address}</div>
  <div class="section">
    {grad}
    {status}
  </div>
  <div class="section">
    {pol}
    {usd}
  </div>
  <div class="section">
    {signers}
  </div>
  <div class="section">
    {activity}
  </div>"#,
        name = escape_html(&vault.display_name),
        id = escape_html(&vault.student_id),
        address = address,
        grad = kv("Graduation Year", &grad_year, false),
        status = kv("Status", &vault.status.to_string(), false),
        pol = kv("POL Balance", &format!("{} POL", fmt_number(vault.pol_balance, 2)), false),
        usd = kv("USD Equivalent", &usd(vault.usd_balance), false),
        signers = render_signers(&vault.signers),
        activity = kv("Last Activity", &last_activity, false),
    )
}

fn hidden(visible: bool) -> &'static str {
    if visible {
        ""
    } else {
        " hidden"
    }
}

pub fn render_page(state: &DashboardState) -> String {
    let panel = render_panel(state);
    // Rooted at `/` so a server-opened panel leaves `/#/vault/<id>`.
    let location_script = state
        .location()
        .map(|fragment| {
            format!(
                r#"<script>history.replaceState({{}}, "", {});</script>"#,
                script_string(&format!("/{}", fragment))
            )
        })
        .unwrap_or_default();

    format!(
        r##"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Graduation Vaults</title>
<style>
.hidden {{ display: none; }}
.mono {{ font-family: ui-monospace, monospace; }}
.grid {{ display: grid; grid-template-columns: repeat(auto-fill, minmax(220px, 1fr)); gap: 12px; }}
.vault-card {{ border: 1px solid #ddd; border-radius: 8px; padding: 12px; }}
.badge {{ display: inline-block; padding: 2px 8px; border-radius: 8px; background: #e6f4ea; }}
.badge.warn {{ background: #fdecea; }}
.kv {{ display: flex; justify-content: space-between; }}
.k {{ color: #666; }}
</style>
</head>
<body>
<h1>Graduation Vaults</h1>
{summary}
<form class="search" method="get" action="/">
  <input id="searchInput" name="q" autocomplete="off" placeholder="Search students" value="{query}">
  <input type="hidden" name="submit" value="1">
  <div id="typeahead" class="typeahead{typeahead_hidden}">{typeahead}</div>
</form>
{grid}
<aside id="vaultPanel" class="panel{panel_hidden}">
  <a id="panelClose" class="btn" href="/?close=1">Close</a>
  <div id="panelContent">{panel}</div>
</aside>
<script>
const input = document.getElementById("searchInput");
const typeahead = document.getElementById("typeahead");
const panel = document.getElementById("vaultPanel");
const panelContent = document.getElementById("panelContent");
async function openVault(id) {{
  const res = await fetch("/panel/" + encodeURIComponent(id));
  const html = await res.text();
  if (!res.ok || html.length === 0) return;
  panelContent.innerHTML = html;
  panel.classList.remove("hidden");
  history.replaceState({{}}, "", "#/vault/" + id);
}}
function closeVault() {{
  panel.classList.add("hidden");
  history.replaceState({{}}, "", "#/");
}}
input.addEventListener("input", async (e) => {{
  const res = await fetch("/typeahead?q=" + encodeURIComponent(e.target.value));
  const html = await res.text();
  typeahead.innerHTML = html;
  typeahead.classList.toggle("hidden", html.length === 0);
}});
document.addEventListener("click", async (e) => {{
  const copyBtn = e.target.closest("#copyAddr");
  if (copyBtn) {{
    await navigator.clipboard.writeText(copyBtn.dataset.copy);
    copyBtn.textContent = "Copied";
    setTimeout(() => copyBtn.textContent = "Copy", {copy_ms});
    return;
  }}
  const link = e.target.closest("[data-vault]");
  if (link) {{
    e.preventDefault();
    if (link.dataset.name) input.value = link.dataset.name;
    typeahead.classList.add("hidden");
    openVault(link.dataset.vault);
    return;
  }}
  if (e.target.closest("#panelClose")) {{
    e.preventDefault();
    closeVault();
    return;
  }}
  if (!typeahead.contains(e.target) && e.target !== input) typeahead.classList.add("hidden");
}});
if (location.hash.startsWith("#/vault/") && panel.classList.contains("hidden")) {{
  openVault(decodeURIComponent(location.hash.slice("#/vault/".length)));
}}
</script>
{location_script}
</body>
</html>
"##,
        summary = render_summary(state),
        query = escape_html(state.search_input()),
        typeahead_hidden = hidden(state.typeahead_visible()),
        typeahead = render_typeahead_items(state),
        grid = render_vault_grid(state),
        panel_hidden = hidden(panel.is_some()),
        panel = panel.unwrap_or_default(),
        copy_ms = COPY_FEEDBACK_MS,
        location_script = location_script,
    )
}
