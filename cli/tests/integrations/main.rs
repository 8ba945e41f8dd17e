mod interactive;
mod mcp;
mod run;
mod server;
