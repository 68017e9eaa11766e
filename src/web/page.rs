// HTML page rendering

use super::models::PageContext;
use maud::{DOCTYPE, Markup, html};

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0 auto; max-width: 960px; padding: 1.5rem; color: #222; }
header { display: flex; justify-content: space-between; align-items: baseline; flex-wrap: wrap; }
.meta { color: #666; font-size: 0.9rem; }
form { margin: 1.5rem 0; padding: 1rem; border: 1px dashed #aaa; border-radius: 8px; }
.results { display: grid; grid-template-columns: repeat(auto-fit, minmax(280px, 1fr)); gap: 1rem; }
figure { margin: 0; }
figure img { max-width: 100%; border-radius: 4px; }
.checkerboard { background: repeating-conic-gradient(#ddd 0% 25%, #fff 0% 50%) 50% / 20px 20px; }
"#;

/// Renders the full page for a context.
pub fn render_page(context: &PageContext) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { "RemoveBG Web" }
                style { (maud::PreEscaped(STYLE)) }
            }
            body {
                header {
                    h1 { "RemoveBG Web" }
                    p.meta {
                        "by " (context.author_name)
                        " · " (context.app_version)
                        " · last updated " (context.last_updated)
                    }
                }
                form action="/remove" method="post" enctype="multipart/form-data" {
                    input type="file" name="file" accept="image/*" required;
                    " "
                    button type="submit" { "Remove background" }
                }
                @if let (Some(original), Some(result)) = (&context.original_image, &context.result_image) {
                    section.results {
                        figure {
                            figcaption { "Original" }
                            img id="original-image" src=(original) alt="Original image";
                        }
                        figure {
                            figcaption { "Background removed" }
                            img id="result-image" class="checkerboard" src=(result) alt="Background removed";
                            @if let Some(file_name) = &context.file_name {
                                p {
                                    a id="download" href=(result) download=(file_name) { "Download " (file_name) }
                                }
                            }
                        }
                    }
                }
                section.history {
                    h2 { "Update history" }
                    ul {
                        @for entry in context.update_history {
                            li { time { (entry.date) } ": " (entry.detail) }
                        }
                    }
                }
            }
        }
    }
}
