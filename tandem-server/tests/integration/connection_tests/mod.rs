mod test_first_join_gets_empty_roster;
mod test_rejoin_is_idempotent;
