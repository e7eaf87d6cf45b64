use crate::api;

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Api(#[from] api::Error),

    #[error("No depth change is waiting for confirmation")]
    NotPending,

    #[error("A simulation request is still in flight")]
    Busy,

    #[error("A post needs both an author and some content")]
    EmptyPost,
}
