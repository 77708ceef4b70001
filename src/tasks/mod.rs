pub mod auto_refresh;
