mod line;
mod scheduler;
