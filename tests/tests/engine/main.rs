mod helpers;
mod properties;
mod scenarios;
