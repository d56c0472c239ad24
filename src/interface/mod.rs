mod crawler;
mod enricher;
mod fetcher;
mod lookup;
mod persister;
mod sleeper;

pub use crawler::*;
pub use enricher::*;
pub use fetcher::*;
pub use lookup::*;
pub use persister::*;
pub use sleeper::*;
