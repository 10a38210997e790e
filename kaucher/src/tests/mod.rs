// Interval tests
mod modal_interval;
mod shape_constraint;


mod ktree;

// Evaluation tests
mod dualizer;
