mod auth_test;
mod availability_test;
