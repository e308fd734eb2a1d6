use crate::requests::RequestStore;
use crate::sessions::SessionStore;

pub trait Store {
    type Requests<'a>: RequestStore
    where
        Self: 'a;
    type Sessions<'a>: SessionStore
    where
        Self: 'a;

    fn requests(&self) -> Self::Requests<'_>;
    fn sessions(&self) -> Self::Sessions<'_>;
}
