mod common;
mod complaints;
mod ledger;
mod rooms;
