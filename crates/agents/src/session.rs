use safar_storage::BookingStore;
use uuid::Uuid;

/// Everything one conversation owns. Nothing here is shared between sessions.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub user_name: String,
    pub user_phone: String,
    pub bookings: BookingStore,
}

impl Session {
    pub fn new(user_name: impl Into<String>, user_phone: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_name: user_name.into(),
            user_phone: user_phone.into(),
            bookings: BookingStore::new(),
        }
    }
}
