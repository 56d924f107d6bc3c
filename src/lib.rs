//! UniSystem - 高校教务管理后端服务
//!
//! 基于 Actix Web 构建：院系、课程、学期、选课、成绩与 GPA、
//! 二维码考勤、站内通知、安全审计以及贪心排课。
//!
//! # 架构
//! - `cache`: 缓存层（Moka/Redis）
//! - `config`: 配置管理
//! - `entity`: SeaORM 数据库实体
//! - `errors`: 统一错误处理
//! - `middlewares`: 认证授权中间件
//! - `models`: 数据模型定义
//! - `routes`: API 路由层
//! - `runtime`: 运行时生命周期管理
//! - `scheduler`: 贪心排课算法
//! - `services`: 业务逻辑层
//! - `storage`: 数据存储层（SeaORM）
//! - `utils`: 工具函数

pub mod cache;
pub mod config;
pub mod entity;
pub mod errors;
pub mod middlewares;
pub mod models;
pub mod routes;
pub mod runtime;
pub mod scheduler;
pub mod services;
pub mod storage;
pub mod utils;
