mod test_reconnect_rejoins;
mod test_room_change;
