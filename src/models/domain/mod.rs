pub mod application;
pub mod marathon;
pub use application::Application;
pub use marathon::Marathon;

use mongodb::bson::Document;

pub(crate) fn strip_reserved(document: &mut Document, reserved: &[&str]) {
    for key in reserved {
        document.remove(*key);
    }
}
