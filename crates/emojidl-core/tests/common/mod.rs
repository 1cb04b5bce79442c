pub mod route_server;
