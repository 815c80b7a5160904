mod helpers;

mod chronos;
mod fetch;
mod request;
