mod about;
mod health;
mod inbox;
mod portal;
mod research;
mod sections;

pub use about::update_about;
pub use health::health_check;
pub use inbox::{
    delete_application, delete_message, list_applications, list_messages, mark_message_read,
    set_application_status, submit_application, submit_message,
};
pub use portal::{export_portal, get_portal, import_portal, refresh_portal, reset_portal};
pub use research::import_bibtex;
pub use sections::{create_record, delete_record, list_records, update_record};
