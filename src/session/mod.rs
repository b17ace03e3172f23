mod login;
mod session;
mod token_store;

pub use login::{LoginError, login};
pub use session::{Credentials, Session, SessionError};
pub use token_store::{TokenStore, TokenStoreError};
