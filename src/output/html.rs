use std::fmt::Write;

use crate::chart::EventBand;
use crate::format::escape_xml;

const HOVER_SCRIPT: &str = r#"document.querySelectorAll('.event-text').forEach(function (el) {
  var band = document.getElementById(el.dataset.band);
  if (!band) { return; }
  el.addEventListener('mouseover', function () { band.style.display = ''; });
  el.addEventListener('mouseout', function () { band.style.display = 'none'; });
});
"#;

pub struct Page<'a> {
    pub title: &'a str,
    pub stylesheet: &'a str,
    pub svg: &'a str,
    pub bands: &'a [EventBand],
    pub summary: &'a str,
}

/// Self-contained report page: event labels on top, chart below. Hovering
/// a label reveals its band in the chart.
pub fn render_page(page: &Page<'_>) -> String {
    let mut html = String::new();
    let _ = writeln!(html, "<!DOCTYPE html>");
    let _ = writeln!(html, "<html>");
    let _ = writeln!(html, "<head>");
    let _ = writeln!(html, "<meta charset=\"utf-8\">");
    let _ = writeln!(html, "<title>{}</title>", escape_xml(page.title));
    let _ = writeln!(html, "<style>\n{}</style>", page.stylesheet);
    let _ = writeln!(html, "</head>");
    let _ = writeln!(html, "<body>");
    let _ = writeln!(html, "<div id=\"content\">");
    let _ = writeln!(html, "<h3>{}</h3>", escape_xml(page.title));
    let _ = writeln!(html, "<h4 class=\"timeline\">");
    for band in page.bands {
        let _ = writeln!(
            html,
            "<span class=\"event-text\" data-band=\"{}\" title=\"{} ({:.1}s - {:.1}s)\">{}</span>",
            escape_xml(&band.id),
            escape_xml(&band.full_label),
            band.start,
            band.end,
            escape_xml(&band.label)
        );
    }
    let _ = writeln!(html, "</h4>");
    html.push_str(page.svg);
    let _ = writeln!(html, "<p class=\"summary\">{}</p>", escape_xml(page.summary));
    let _ = writeln!(html, "</div>");
    let _ = writeln!(html, "<script>\n{HOVER_SCRIPT}</script>");
    let _ = writeln!(html, "</body>");
    let _ = writeln!(html, "</html>");
    html
}
