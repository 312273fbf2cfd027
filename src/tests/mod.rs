mod assume_role;
mod snapshot;
