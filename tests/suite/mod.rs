mod gesture_flow;
mod leaderboard;
mod session_flow;
