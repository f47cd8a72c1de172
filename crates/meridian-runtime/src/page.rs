//! Standalone HTML page around the rendered card container

use meridian_core::DisplaySettings;

const STYLE: &str = "body{font-family:sans-serif;margin:2rem}\
#container{display:flex;flex-wrap:wrap;gap:1rem}\
.card{border:1px solid #ccc;border-radius:.5rem;padding:.5rem}\
.card-header{font-size:1.1rem;margin:0 0 .5rem 0}";

/// Wrap rendered container markup into a page that reloads itself every
/// second
pub fn render_page(container: &str, settings: &DisplaySettings) -> String {
    let mut page = String::with_capacity(container.len() + 512);
    page.push_str("<!DOCTYPE html><html><head><meta charset=\"utf-8\">");
    page.push_str("<meta http-equiv=\"refresh\" content=\"1\">");
    page.push_str("<title>World Clock</title><style>");
    page.push_str(STYLE);
    page.push_str("</style></head><body data-24-hour=\"");
    page.push_str(if settings.use_24_hour { "true" } else { "false" });
    page.push_str("\" data-seconds=\"");
    page.push_str(if settings.show_seconds { "true" } else { "false" });
    page.push_str("\">");
    page.push_str(container);
    page.push_str("</body></html>");
    page
}
