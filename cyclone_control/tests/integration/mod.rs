mod connect_failure;
mod lifecycle;
mod periodic_scenario;
mod randomizer_scenario;
mod runner;
mod support;
