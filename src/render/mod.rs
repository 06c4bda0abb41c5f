mod sql;
mod typescript;

pub use sql::render_sql;
pub use typescript::render_typescript;
