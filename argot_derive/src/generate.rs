mod instance;
mod value_enum;
