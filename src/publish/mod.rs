/// Publishing: the form, tag and release-time resolution, payload building
/// and the flows that drive the SDK
pub mod edit;
pub mod flows;
pub mod form;
pub mod payload;
pub mod reducer;
pub mod release_time;
pub mod tags;

pub use edit::prepare_edit;
pub use flows::{
    do_clear_publish, do_prepare_edit, do_publish, do_publish_resume, do_reset_thumbnail_status,
    do_update_publish_form, do_upload_thumbnail, do_upload_thumbnail_from_path, PublishOutcome,
};
pub use form::{PublishFormState, PublishFormUpdate};
pub use payload::{resolve_publish_payload, PublishPayload};
pub use release_time::resolve_release_time;
pub use tags::{reconcile_tags, ContentTag, TagSet};
