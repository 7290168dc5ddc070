mod accounts;
mod auth;
mod catalog;
mod helpers;
mod mocks;
mod orders;
mod partner;
