//! HTML export

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Local};

use shelf_core::render::escape_markup;
use shelf_core::{CategoryFilter, KeyValueStore, Session};

use crate::output::Output;

const STYLESHEET: &str = "\
body { font-family: system-ui, sans-serif; margin: 2rem; background: #f8fafc; }
#booksGrid { display: grid; grid-template-columns: repeat(auto-fill, minmax(220px, 1fr)); gap: 1rem; }
.book-card { background: #fff; border-radius: 8px; padding: 1rem; box-shadow: 0 1px 3px rgba(0,0,0,.1); }
.book-card img { width: 100%; height: 260px; object-fit: cover; border-radius: 4px; }
.book-category { display: inline-block; font-size: .8rem; padding: .1rem .5rem; border-radius: 999px; background: #e0e7ff; }
.card-actions { display: none; }
#noBooksMsg { color: #64748b; }";

/// Write the rendered catalog as a standalone HTML page
pub fn export<K: KeyValueStore>(
    session: &mut Session<K>,
    category: Option<String>,
    path: Option<PathBuf>,
    output: &Output,
) -> Result<()> {
    session.set_filter(CategoryFilter::from_option(category.as_deref()));
    let html = html_document(session, Local::now());

    match path {
        Some(path) => {
            fs::write(&path, html)
                .with_context(|| format!("Failed to write export to {:?}", path))?;
            output.success(&format!(
                "Exported {} book(s) to {}",
                session.container().len(),
                path.display()
            ));
        }
        None => print!("{}", html),
    }

    Ok(())
}

/// Full page around the grid and the empty-state indicator
fn html_document<K: KeyValueStore>(session: &Session<K>, generated: DateTime<Local>) -> String {
    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head>\n\
         <meta charset=\"utf-8\" />\n\
         <title>Book Catalog</title>\n\
         <style>\n{style}\n</style>\n\
         </head>\n\
         <body>\n\
         <h1>Book Catalog</h1>\n\
         <p class=\"meta\">Filter: {filter} &middot; Generated {generated}</p>\n\
         {body}\n\
         </body>\n\
         </html>\n",
        style = STYLESHEET,
        filter = escape_markup(session.filter().label()),
        generated = generated.format("%Y-%m-%d %H:%M"),
        body = session.to_html(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use shelf_core::{MemoryKeyValueStore, Store};
    use tempfile::TempDir;

    use crate::output::OutputFormat;

    fn session() -> Session<MemoryKeyValueStore> {
        let mut session = Session::new(Store::with_backend(MemoryKeyValueStore::new()));
        session
            .add_book("Tom & Jerry", "Hanna <Barbera>", "Fiction")
            .unwrap();
        session.add_book("Cosmos", "Carl Sagan", "Science").unwrap();
        session
    }

    #[test]
    fn test_html_document_escapes_and_stamps() {
        let session = session();
        let generated = Local.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();
        let html = html_document(&session, generated);

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("Generated 2024-05-01 09:30"));
        assert!(html.contains("Tom &amp; Jerry"));
        assert!(html.contains("Hanna &lt;Barbera&gt;"));
        assert!(html.contains("display: none"));
    }

    #[test]
    fn test_export_writes_filtered_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("books.html");
        let mut session = session();

        export(
            &mut session,
            Some("Science".to_string()),
            Some(path.clone()),
            &Output::new(OutputFormat::Quiet),
        )
        .unwrap();

        let html = fs::read_to_string(&path).unwrap();
        assert!(html.contains("Cosmos"));
        assert!(!html.contains("Tom &amp; Jerry"));
        assert!(html.contains("Filter: Science"));
    }

    #[test]
    fn test_export_empty_view_shows_message() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("empty.html");
        let mut session = session();

        export(
            &mut session,
            Some("History".to_string()),
            Some(path.clone()),
            &Output::new(OutputFormat::Quiet),
        )
        .unwrap();

        let html = fs::read_to_string(&path).unwrap();
        assert!(html.contains("display: block"));
        assert!(html.contains("No books found"));
    }
}
