use cadence_model::{Catalog, Label, Share, User, UserActivity};
use cadence_serde::Record;

use super::Projector;

impl<L: Catalog + UserActivity> Projector<'_, L> {
    pub fn share(&self, share: &Share) -> Record {
        Record::new("share")
            .with_id(share.id)
            .text("name", &share.object_name)
            .text("user", &share.user_name)
            .integer("allow_stream", i64::from(share.allow_stream))
            .integer("allow_download", i64::from(share.allow_download))
            .text("creation_date", &share.creation_date)
            .text("lastvisit_date", &share.lastvisit_date)
            .text("object_type", &share.object_type)
            .unsigned("object_id", share.object_id)
            .integer("expire_days", share.expire_days)
            .integer("max_counter", share.max_counter)
            .integer("counter", share.counter)
            .text("secret", &share.secret)
            .text("public_url", &share.public_url)
            .text("description", &share.description)
    }

    pub fn label(&self, label: &Label) -> Record {
        Record::new("label")
            .with_id(label.id)
            .text("name", &label.name)
            .integer("artists", label.artist_count)
            .text("summary", &label.summary)
            .text("external_link", &label.link)
            .text("address", &label.address)
            .text("category", &label.category)
            .text("email", &label.email)
            .text("website", &label.website)
            .unsigned("user", label.user)
    }

    pub fn user(&self, user: &User) -> Record {
        Record::new("user")
            .with_id(user.id)
            .text("username", &user.username)
    }
}
