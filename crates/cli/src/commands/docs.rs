//! Document store inspection.

use flatfile_cms_server::config::CmsConfig;
use flatfile_cms_server::store::{DocumentError, DocumentStore};

/// Print every document name with its content kind.
///
/// # Errors
///
/// Returns an error if the document directory cannot be read.
#[allow(clippy::print_stdout)]
pub async fn list(config: &CmsConfig) -> Result<(), DocumentError> {
    let store = DocumentStore::new(&config.data_dir);

    for name in store.list().await? {
        println!("{name}\t{}", name.kind().label());
    }
    Ok(())
}
