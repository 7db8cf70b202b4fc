//! HTML reporter: generates the static trend dashboard
//!
//! The day list and summary are rendered server-side; the trend chart is
//! drawn client-side by Chart.js from data inlined into the page or fetched
//! from the trend file.

use crate::trend::trend_points;
use crate::{Dashboard, DayReport, UnstableTest};
use serde::Deserialize;
use std::str::FromStr;

const CHART_JS_URL: &str = "https://cdn.jsdelivr.net/npm/chart.js@4.4.1/dist/chart.umd.min.js";

/// Chart.js chart type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    #[default]
    Line,
    Bar,
}

impl FromStr for ChartKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "line" => Ok(ChartKind::Line),
            "bar" => Ok(ChartKind::Bar),
            other => Err(format!("unknown chart type '{}' (expected line or bar)", other)),
        }
    }
}

impl std::fmt::Display for ChartKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChartKind::Line => write!(f, "line"),
            ChartKind::Bar => write!(f, "bar"),
        }
    }
}

/// Where the chart reads its data from
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ChartData {
    /// Trend sequence embedded in the page
    #[default]
    Inline,
    /// Trend file fetched at view time (href relative to the page)
    Fetch(String),
}

/// Escapes a string for embedding inside a `<script>` block
fn escape_json_for_script(s: &str) -> String {
    // serde_json already escapes quotes/backslashes; we just need to ensure
    // no </script> can appear inside the block.
    s.replace("</", "<\\/")
}

/// Escapes text for HTML element content and attribute values
fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
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

/// Reporter that generates the HTML dashboard
pub struct HtmlReporter {
    title: String,
    chart: ChartKind,
    data: ChartData,
}

impl HtmlReporter {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            chart: ChartKind::default(),
            data: ChartData::default(),
        }
    }

    pub fn chart(mut self, chart: ChartKind) -> Self {
        self.chart = chart;
        self
    }

    pub fn data(mut self, data: ChartData) -> Self {
        self.data = data;
        self
    }

    /// Generate the full HTML document
    pub fn report(&self, dashboard: &Dashboard) -> String {
        let mut html = String::with_capacity(16_384);
        html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"UTF-8\">\n");
        html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
        html.push_str(&format!("<title>{}</title>\n", escape_html(&self.title)));
        html.push_str(Self::template_style());
        html.push_str("</head>\n<body>\n<div class=\"shell\">\n");
        html.push_str(&format!(
            "  <header><h1>{}</h1></header>\n",
            escape_html(&self.title)
        ));
        html.push_str(&self.render_stats(dashboard));
        html.push_str(
            "  <section class=\"chart-box\"><canvas id=\"trend-chart\"></canvas><p class=\"note\" id=\"chart-note\"></p></section>\n",
        );
        html.push_str(&self.render_days(&dashboard.days));
        html.push_str(&self.render_unstable(&dashboard.unstable));
        html.push_str("</div>\n");
        html.push_str(&format!("<script src=\"{}\"></script>\n", CHART_JS_URL));
        html.push_str(&self.render_data(dashboard));
        html.push_str(Self::template_script());
        html.push_str("</body>\n</html>\n");
        html
    }

    fn render_stats(&self, dashboard: &Dashboard) -> String {
        let totals = dashboard.totals();
        let rate = dashboard
            .latest()
            .and_then(|d| d.counts.pass_rate())
            .map(|r| format!("{:.1}%", r))
            .unwrap_or_else(|| "n/a".to_string());
        let failed_class = if totals.failed > 0 { " c-red" } else { "" };
        format!(
            "  <div class=\"stats-bar\">\n\
             \x20   <div class=\"stat\"><span class=\"val\">{}</span><span class=\"lbl\">Days</span></div>\n\
             \x20   <div class=\"stat\"><span class=\"val c-green\">{}</span><span class=\"lbl\">Passed</span></div>\n\
             \x20   <div class=\"stat\"><span class=\"val{}\">{}</span><span class=\"lbl\">Failed</span></div>\n\
             \x20   <div class=\"stat\"><span class=\"val c-muted\">{}</span><span class=\"lbl\">Other</span></div>\n\
             \x20   <div class=\"stat\"><span class=\"val\">{}</span><span class=\"lbl\">Latest pass rate</span></div>\n\
             \x20 </div>\n",
            dashboard.days.len(),
            totals.passed,
            failed_class,
            totals.failed,
            totals.other,
            rate
        )
    }

    fn render_days(&self, days: &[DayReport]) -> String {
        let mut html = String::from("  <section>\n    <h2>Daily reports</h2>\n");
        if days.is_empty() {
            html.push_str("    <div class=\"empty\">No reports found.</div>\n  </section>\n");
            return html;
        }
        html.push_str("    <ul class=\"days\">\n");
        for day in days {
            let date = escape_html(&day.date);
            let label = match &day.detail {
                Some(href) => format!("<a href=\"{}\">{}</a>", escape_html(href), date),
                None => format!("<span title=\"No detail report\">{}</span>", date),
            };
            let total = day.counts.total().max(1);
            let pass_pct = day.counts.passed * 100 / total;
            let fail_pct = day.counts.failed * 100 / total;
            html.push_str(&format!(
                "      <li class=\"day\"><span class=\"date\">{}</span>\
                 <span class=\"c-green\">{} passed</span>\
                 <span class=\"{}\">{} failed</span>\
                 <span class=\"c-muted\">{} other</span>\
                 <span class=\"mini-bar\"><span class=\"bg-green\" style=\"width:{}%\"></span><span class=\"bg-red\" style=\"width:{}%\"></span></span></li>\n",
                label,
                day.counts.passed,
                if day.counts.failed > 0 { "c-red" } else { "c-muted" },
                day.counts.failed,
                day.counts.other,
                pass_pct,
                fail_pct
            ));
        }
        html.push_str("    </ul>\n  </section>\n");
        html
    }

    fn render_unstable(&self, unstable: &[UnstableTest]) -> String {
        if unstable.is_empty() {
            return String::new();
        }
        let mut html = String::from(
            "  <section>\n    <h2>Top unstable tests</h2>\n    <table class=\"unstable\">\n      <thead><tr><th>Test</th><th>Failing days</th></tr></thead>\n      <tbody>\n",
        );
        for test in unstable {
            html.push_str(&format!(
                "        <tr><td>{}</td><td class=\"num\">{}</td></tr>\n",
                escape_html(&test.name),
                test.failures
            ));
        }
        html.push_str("      </tbody>\n    </table>\n  </section>\n");
        html
    }

    fn render_data(&self, dashboard: &Dashboard) -> String {
        let (trend_json, url_json) = match &self.data {
            ChartData::Inline => {
                let points = trend_points(&dashboard.days);
                let json = serde_json::to_string(&points).unwrap_or_else(|_| "[]".to_string());
                (json, "null".to_string())
            }
            ChartData::Fetch(href) => (
                "[]".to_string(),
                serde_json::to_string(href).unwrap_or_else(|_| "null".to_string()),
            ),
        };
        format!(
            "<script>const CHART_TYPE=\"{}\";const TREND={};const TREND_URL={};</script>\n",
            self.chart,
            escape_json_for_script(&trend_json),
            escape_json_for_script(&url_json)
        )
    }

    // ─── HTML template pieces ────────────────────────────────────────────

    fn template_style() -> &'static str {
        r##"<style>
:root{--bg:#0d0d11;--surface:#16161b;--surface2:#1e1e24;--border:#2a2a32;--text:#e4e4e7;--muted:#71717a;--green:#22c55e;--red:#ef4444;--blue:#3b82f6;--radius:8px}
*{box-sizing:border-box;margin:0;padding:0}
body{font-family:-apple-system,BlinkMacSystemFont,'Segoe UI',Roboto,Oxygen,sans-serif;background:var(--bg);color:var(--text);line-height:1.5;min-height:100vh}
a{color:var(--blue);text-decoration:none}
a:hover{text-decoration:underline}
.shell{max-width:1100px;margin:0 auto}
header{padding:1.25rem 1.5rem;border-bottom:1px solid var(--border)}
header h1{font-size:1.125rem;font-weight:700}
h2{font-size:.75rem;text-transform:uppercase;letter-spacing:.5px;color:var(--muted);margin:1.25rem 1.5rem .5rem}

/* ── Stats bar ── */
.stats-bar{display:flex;border-bottom:1px solid var(--border);background:var(--surface)}
.stat{flex:1;padding:.875rem 1.25rem;border-right:1px solid var(--border);text-align:center}
.stat:last-child{border-right:none}
.stat .val{font-size:1.5rem;font-weight:700;display:block}
.stat .lbl{font-size:.75rem;color:var(--muted);text-transform:uppercase;letter-spacing:.5px}

/* ── Chart ── */
.chart-box{position:relative;height:320px;margin:1rem 1.5rem;padding:1rem;background:var(--surface);border:1px solid var(--border);border-radius:var(--radius)}
.note{font-size:.8125rem;color:var(--muted)}

/* ── Day list ── */
.days{list-style:none;margin:0 1.5rem}
.day{display:grid;grid-template-columns:minmax(0,1fr) 90px 90px 90px 120px;align-items:center;gap:.5rem;padding:.5rem .75rem;border-bottom:1px solid var(--border);font-size:.8125rem;font-variant-numeric:tabular-nums}
.day:hover{background:var(--surface2)}
.mini-bar{display:flex;width:120px;height:6px;background:var(--border);border-radius:3px;overflow:hidden}
.mini-bar span{display:block;height:100%}

/* ── Unstable tests ── */
.unstable{width:calc(100% - 3rem);margin:0 1.5rem 2rem;border-collapse:collapse;font-size:.8125rem}
.unstable th{text-align:left;color:var(--muted);font-weight:600;padding:.4rem .75rem;border-bottom:1px solid var(--border)}
.unstable td{padding:.4rem .75rem;border-bottom:1px solid var(--border)}
.unstable .num{text-align:right;font-variant-numeric:tabular-nums}

/* ── Empty state ── */
.empty{text-align:center;padding:3rem 1rem;color:var(--muted);font-size:.875rem}

/* ── Utility ── */
.c-green{color:var(--green)}.c-red{color:var(--red)}.c-muted{color:var(--muted)}
.bg-green{background:var(--green)}.bg-red{background:var(--red)}
</style>
"##
    }

    fn template_script() -> &'static str {
        r##"<script>
(function(){
"use strict";
const note=document.getElementById('chart-note');

/* chart runs oldest to newest whatever the list order */
function draw(points){
  const rows=[...points].sort((a,b)=>a.date<b.date?-1:a.date>b.date?1:0);
  if(!rows.length){note.textContent='No data to chart yet.';return;}
  new Chart(document.getElementById('trend-chart'),{
    type:CHART_TYPE,
    data:{
      labels:rows.map(r=>r.date),
      datasets:[
        {label:'Passed',data:rows.map(r=>r.passed),borderColor:'#22c55e',backgroundColor:'rgba(34,197,94,.35)',tension:.25},
        {label:'Failed',data:rows.map(r=>r.failed),borderColor:'#ef4444',backgroundColor:'rgba(239,68,68,.35)',tension:.25}
      ]
    },
    options:{
      responsive:true,
      maintainAspectRatio:false,
      scales:{y:{beginAtZero:true,ticks:{precision:0,color:'#71717a'}},x:{ticks:{color:'#71717a'}}},
      plugins:{legend:{labels:{color:'#e4e4e7'}}}
    }
  });
}

if(typeof Chart==='undefined'){note.textContent='Chart.js could not be loaded.';return;}
if(TREND_URL){
  fetch(TREND_URL).then(r=>{if(!r.ok)throw new Error(r.status);return r.json()}).then(draw)
    .catch(e=>{note.textContent='Could not load '+TREND_URL+': '+e.message});
}else{
  draw(TREND);
}
})();
</script>
"##
    }
}
