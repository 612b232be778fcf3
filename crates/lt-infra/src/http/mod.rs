pub mod mirror_fetcher;

pub use mirror_fetcher::ReqwestMirrorFetcher;
