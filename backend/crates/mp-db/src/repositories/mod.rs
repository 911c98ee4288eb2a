pub mod puppet_repository;
