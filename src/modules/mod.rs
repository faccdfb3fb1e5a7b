pub mod authors;
pub mod books;

use bookshelf_db::SqlitePool;
use bookshelf_kernel::ModuleRegistry;

/// Register every catalog module with the registry.
///
/// Authors come first: books hold a foreign key to the authors table.
pub fn register_all(registry: &mut ModuleRegistry, pool: &SqlitePool) {
    registry.register(authors::create_module(pool.clone()));
    registry.register(books::create_module(pool.clone()));
}
