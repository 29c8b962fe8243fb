// Adapters layer: concrete sources and presentation sinks the core is wired to.

pub mod console;
pub mod csv_table;
pub mod file;
pub mod geojson;
pub mod html;
pub mod http;

pub use console::{ConsoleMap, ConsolePresenter};
pub use file::FileCsvSource;
pub use html::HtmlPresenter;
pub use http::HttpCsvSource;
