//! HTML exporter: a single self-contained interactive report page
//!
//! The initial page state is produced by running the viewer against an
//! in-memory `Page`. Each non-empty category is embedded once as a
//! `<template>`, and a small vanilla JS script swaps templates into the
//! details container and wires the same interactions the viewer models.

use crate::config::Config;
use crate::render::{escape, render_category, LOG_WINDOW_FEATURES, LOG_WINDOW_PARTS};
use crate::view::{Page, Viewer};
use crate::{Category, Report};
use serde::Serialize;

/// Makes serialized JSON safe to embed in a `<script>` block
fn escape_json_for_script(s: &str) -> String {
    // serde_json already escapes quotes/backslashes; no closing tag or
    // comment opener may appear inside the block.
    s.replace("</", "<\\/").replace("<!--", "<\\u0021--")
}

/// Reporter that generates a self-contained HTML page
pub struct HtmlExporter;

#[derive(Serialize)]
struct JsLog<'a> {
    name: &'a str,
    content: &'a str,
}

impl HtmlExporter {
    pub fn new() -> Self {
        Self
    }

    /// Generate the full HTML document
    pub fn export(&self, report: &Report, config: &Config) -> String {
        let mut viewer = Viewer::new(report, Page::new());
        viewer.start();
        let page = viewer.into_surface();

        let logs: Vec<JsLog> = report
            .logs
            .iter()
            .map(|l| JsLog {
                name: &l.name,
                content: &l.content,
            })
            .collect();
        let logs_json = serde_json::to_string(&logs).unwrap_or_else(|_| "[]".to_string());
        let window_json =
            serde_json::to_string(&LOG_WINDOW_PARTS).unwrap_or_else(|_| "[\"\",\"\",\"\"]".to_string());
        let features_json = serde_json::to_string(LOG_WINDOW_FEATURES)
            .unwrap_or_else(|_| "\"\"".to_string());

        let mut html = String::with_capacity(32_768);
        html.push_str(Self::template_head());
        html.push_str("<title>");
        html.push_str(&escape(config.title()));
        html.push_str("</title>\n</head>\n<body>\n");
        html.push_str(&Self::body(&page, config.title()));
        html.push_str(&Self::templates(report));
        html.push_str("<script>const LOGS=");
        html.push_str(&escape_json_for_script(&logs_json));
        html.push_str(";const LOG_WINDOW=");
        html.push_str(&escape_json_for_script(&window_json));
        html.push_str(";const LOG_WINDOW_FEATURES=");
        html.push_str(&escape_json_for_script(&features_json));
        html.push_str(";</script>\n");
        html.push_str(Self::template_script());
        html.push_str("</body>\n</html>\n");

        log::debug!("exported {} byte(s) of html", html.len());
        html
    }

    fn body(page: &Page, title: &str) -> String {
        let mut out = String::new();
        out.push_str(&format!("<header><h1>{}</h1></header>\n", escape(title)));

        out.push_str("<section class=\"summary\">\n<table>\n");
        for (field, value) in &page.fields {
            let class = value
                .class
                .map(|c| format!(" class=\"{}\"", c))
                .unwrap_or_default();
            out.push_str(&format!(
                "<tr><th>{}</th><td id=\"{}\"{}>{}</td></tr>\n",
                field.label(),
                field.id(),
                class,
                escape(&value.text)
            ));
        }
        out.push_str("</table>\n<ul id=\"frameworkVersions\">\n");
        for (name, version) in &page.versions {
            out.push_str(&format!(
                "<li><strong>{}:</strong> {}</li>\n",
                escape(name),
                escape(version)
            ));
        }
        out.push_str("</ul>\n</section>\n");

        out.push_str("<nav class=\"category-buttons\">\n");
        for category in Category::ALL {
            let Some(button) = page.button(category) else {
                continue;
            };
            let active = if page.active_category == Some(category) {
                " active"
            } else {
                ""
            };
            let disabled = if button.enabled { "" } else { " disabled" };
            out.push_str(&format!(
                "<button id=\"btn-{key}\" class=\"category-button{active}\" data-category=\"{key}\"{disabled}>{label}</button>\n",
                key = category.key(),
                active = active,
                disabled = disabled,
                label = escape(&button.label),
            ));
        }
        out.push_str("</nav>\n");

        out.push_str("<div id=\"test-details\">\n");
        out.push_str(page.details.as_str());
        out.push_str("</div>\n");

        let hidden = if page.logs_hidden { " hidden" } else { "" };
        out.push_str(&format!("<section id=\"logs-section\"{}>\n<h2>Logs</h2>\n", hidden));
        if !page.logs_hidden {
            out.push_str("<select id=\"log-selector\">\n");
            for option in &page.log_options {
                out.push_str(&format!(
                    "<option value=\"{}\">{}</option>\n",
                    escape(&option.value),
                    escape(&option.label)
                ));
            }
            out.push_str("</select>\n<button id=\"open-log-window\">Open in New Window</button>\n");
            out.push_str(&format!(
                "<pre id=\"log-content\">{}</pre>\n",
                escape(page.log_content.as_deref().unwrap_or_default())
            ));
        }
        out.push_str("</section>\n");
        out
    }

    fn templates(report: &Report) -> String {
        Category::ALL
            .into_iter()
            .filter_map(|c| render_category(report, c))
            .map(|rendered| {
                format!(
                    "<template id=\"tpl-{}\">\n{}</template>\n",
                    rendered.category.key(),
                    rendered.fragment
                )
            })
            .collect()
    }

    // ─── HTML template pieces ────────────────────────────────────────────

    fn template_head() -> &'static str {
        r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<style>
:root{--bg:#f5f6f8;--surface:#fff;--border:#dcdfe4;--text:#1f2328;--muted:#656d76;--green:#1a7f37;--red:#cf222e;--blue:#0969da;--radius:6px}
*{box-sizing:border-box}
body{font-family:-apple-system,BlinkMacSystemFont,'Segoe UI',Roboto,sans-serif;background:var(--bg);color:var(--text);margin:0;padding:1.5rem;line-height:1.45}
header h1{font-size:1.25rem;margin:0 0 1rem}
/* ── Summary ── */
.summary{background:var(--surface);border:1px solid var(--border);border-radius:var(--radius);padding:1rem;margin-bottom:1rem}
.summary table{border-collapse:collapse}
.summary th{text-align:left;color:var(--muted);font-weight:600;padding:.2rem 1rem .2rem 0}
.summary td{padding:.2rem 0}
#frameworkVersions{margin:.75rem 0 0;padding-left:1.25rem;font-size:.875rem}
/* ── Categories ── */
.category-buttons{display:flex;gap:.5rem;margin-bottom:1rem}
.category-button{padding:.4rem .9rem;border:1px solid var(--border);border-radius:var(--radius);background:var(--surface);cursor:pointer;font-weight:600}
.category-button.active{background:var(--blue);border-color:var(--blue);color:#fff}
.category-button:disabled{opacity:.5;cursor:not-allowed}
/* ── Collapsible nodes ── */
.test-details,.step,.assertion{border:1px solid var(--border);border-radius:var(--radius);background:var(--surface);margin:.5rem 0}
.collapsible-header{display:flex;align-items:center;gap:.75rem;padding:.5rem .75rem;cursor:pointer;user-select:none}
.collapsible-header h3,.collapsible-header h4{margin:0;flex:1;font-size:.9375rem}
.collapsible-body{display:none;padding:.5rem .75rem;border-top:1px solid var(--border)}
.collapsible-body.active{display:block}
.toggle-indicator{font-size:.75rem;color:var(--muted);width:1rem}
.status-indicator{font-size:.75rem;font-weight:700;padding:.1rem .5rem;border-radius:10px}
.pass{color:var(--green)}
.fail{color:var(--red)}
.status-indicator.pass{background:rgba(26,127,55,.12)}
.status-indicator.fail{background:rgba(207,34,46,.12)}
/* ── Details ── */
.details-and-screenshot{display:flex;gap:1rem;align-items:flex-start}
.details{flex:1;min-width:0}
.screenshot img{max-width:240px;border:1px solid var(--border);border-radius:4px;cursor:zoom-in}
.exception-details{border-left:3px solid var(--red);background:#fff8f8;padding:.5rem .75rem;margin:.5rem 0}
.exception-header{display:flex;gap:1rem;font-weight:600}
.exception-timestamp{color:var(--muted);font-weight:400}
pre{white-space:pre-wrap;word-break:break-word;margin:.25rem 0}
/* ── Logs ── */
#logs-section{background:var(--surface);border:1px solid var(--border);border-radius:var(--radius);padding:1rem;margin-top:1rem}
#logs-section h2{font-size:1rem;margin:0 0 .5rem}
#log-content{max-height:420px;overflow:auto;background:var(--bg);padding:.75rem;border-radius:4px;font-family:'SF Mono',Consolas,monospace;font-size:.8125rem}
</style>
"##
    }

    fn template_script() -> &'static str {
        r##"<script>
(function(){
"use strict";
/* ── helpers ── */
const $=s=>document.querySelector(s);
const $$=s=>[...document.querySelectorAll(s)];
const esc=s=>{const d=document.createElement('div');d.textContent=s;return d.innerHTML};
/* ── node behaviour, re-attached after every swap ── */
function attach(root){
  root.querySelectorAll('.collapsible-header').forEach(h=>{
    h.onclick=()=>{
      const body=h.nextElementSibling;
      const open=body.classList.toggle('active');
      h.querySelector('.toggle-indicator').textContent=open?'▲':'▼';
    };
  });
  root.querySelectorAll('img[data-open]').forEach(img=>{
    img.onclick=e=>{e.stopPropagation();window.open(img.dataset.open,'_blank')};
  });
}
/* ── categories ── */
function showCategory(key){
  const tpl=document.getElementById('tpl-'+key);
  if(!tpl) return;
  const container=$('#test-details');
  container.replaceChildren(tpl.content.cloneNode(true));
  attach(container);
  $$('.category-button').forEach(b=>b.classList.toggle('active',b.dataset.category===key));
}
$$('.category-button').forEach(b=>{
  b.onclick=()=>{if(!b.disabled) showCategory(b.dataset.category)};
});
attach($('#test-details'));
/* ── logs ── */
const sel=$('#log-selector');
if(sel){
  const current=()=>LOGS.find(l=>l.name===sel.value);
  sel.onchange=()=>{
    const log=current();
    if(!log) return;
    const pre=$('#log-content');
    pre.textContent=log.content;
    pre.scrollTop=pre.scrollHeight;
  };
  $('#open-log-window').onclick=()=>{
    const log=current();
    if(!log) return;
    const w=window.open('','_blank',LOG_WINDOW_FEATURES);
    if(!w) return;
    w.document.write(LOG_WINDOW[0]+esc(log.name)+LOG_WINDOW[1]+esc(log.content)+LOG_WINDOW[2]);
    w.document.close();
  };
}
})();
</script>
"##
    }
}

impl Default for HtmlExporter {
    fn default() -> Self {
        Self::new()
    }
}
