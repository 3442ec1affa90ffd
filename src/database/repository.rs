pub mod games_repository;
pub mod profiles_repository;
pub mod user_games_repository;
