//! Command Handler Module
//!
//! Drives an [`Engine`] from textual command lines. A line is tokenized,
//! the first token picks the command (case-insensitive), and the rest are
//! parsed into the typed arguments and option structs the engine takes.
//!
//! ## Option words
//!
//! - `SET key value [NX|XX] [EX seconds|PX milliseconds]`
//! - `SCAN cursor [MATCH pattern] [COUNT count]`, same for `SSCAN key cursor`
//! - `ZRANGE key start stop [WITHSCORES]`
//! - `ZRANGEBYSCORE key min max [WITHSCORES] [LIMIT offset count]`
//! - `ZUNIONSTORE dest numkeys key [key ...] [WEIGHTS w ...] [AGGREGATE SUM|MIN|MAX]`
//!
//! `SELECT name` switches the storage area of the underlying engine.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     CommandHandler                          │
//! │                                                             │
//! │  ┌─────────────┐    ┌─────────────┐    ┌─────────────┐     │
//! │  │ tokenize()  │───>│  dispatch() │───>│  cmd_*()    │     │
//! │  └─────────────┘    └─────────────┘    └─────────────┘     │
//! │                                               │             │
//! │                                               ▼             │
//! │                                            Engine           │
//! └─────────────────────────────────────────────────────────────┘
//! ```

use super::{Engine, RangeOptions, ScanOptions, SetOptions, UnionOptions};
use crate::error::{EmulatorError, Result};
use crate::protocol::{tokenize, Reply};
use crate::storage::{parse_score, Aggregate};
use tracing::trace;

/// Executes textual commands against an [`Engine`].
#[derive(Debug)]
pub struct CommandHandler {
    engine: Engine,
}

impl CommandHandler {
    /// Creates a handler driving the given engine.
    pub fn new(engine: Engine) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut Engine {
        &mut self.engine
    }

    pub fn into_engine(self) -> Engine {
        self.engine
    }

    /// Tokenizes and executes one command line.
    ///
    /// # Example
    ///
    /// ```
    /// use kvmock::commands::{CommandHandler, Engine};
    /// use kvmock::protocol::Reply;
    /// use kvmock::storage::Registry;
    /// use std::sync::Arc;
    ///
    /// let mut handler = CommandHandler::new(Engine::new(Arc::new(Registry::new())));
    /// handler.execute_line(r#"SET greeting "hello world""#).unwrap();
    /// assert_eq!(handler.execute_line("GET greeting").unwrap(), Reply::bulk("hello world"));
    /// ```
    pub fn execute_line(&mut self, line: &str) -> Result<Reply> {
        let args = tokenize(line).map_err(|e| EmulatorError::invalid(e.to_string()))?;
        self.execute(&args)
    }

    /// Executes an already tokenized command. The first element is the
    /// command name.
    pub fn execute(&mut self, command: &[String]) -> Result<Reply> {
        let Some((name, args)) = command.split_first() else {
            return Err(EmulatorError::invalid("empty command"));
        };

        let cmd = name.to_uppercase();
        trace!(command = %cmd, args = args.len(), "Dispatching command");
        self.dispatch(&cmd, args)
    }

    /// Dispatches a command to its handler.
    fn dispatch(&mut self, cmd: &str, args: &[String]) -> Result<Reply> {
        match cmd {
            // Scalar commands
            "GET" => Ok(self.engine.get(one_key(cmd, args)?)),
            "SET" => self.cmd_set(args),
            "SETNX" => self.cmd_setnx(args),
            "SETEX" => self.cmd_setex(args),
            "MGET" => Ok(self.engine.mget(at_least(cmd, args, 1)?)),
            "MSET" => self.cmd_mset(args),
            "INCR" => Ok(self.engine.incr(one_key(cmd, args)?)),
            "DECR" => Ok(self.engine.decr(one_key(cmd, args)?)),
            "INCRBY" | "DECRBY" => self.cmd_incrby(cmd, args),
            "INCRBYFLOAT" | "DECRBYFLOAT" => self.cmd_incrbyfloat(cmd, args),

            // Key commands
            "TTL" => Ok(self.engine.ttl(one_key(cmd, args)?)),
            "EXPIRE" | "EXPIREAT" => self.cmd_expire(cmd, args),
            "TYPE" => Ok(self.engine.key_type(one_key(cmd, args)?)),
            "EXISTS" => Ok(self.engine.exists(at_least(cmd, args, 1)?)),
            "DEL" => Ok(self.engine.del(at_least(cmd, args, 1)?)),
            "KEYS" => Ok(self.engine.keys(one_key(cmd, args)?)),
            "SCAN" => self.cmd_scan(args),

            // List commands
            "LPUSH" | "RPUSH" => self.cmd_push(cmd, args),
            "LPOP" => Ok(self.engine.lpop(one_key(cmd, args)?)),
            "RPOP" => Ok(self.engine.rpop(one_key(cmd, args)?)),
            "LLEN" => Ok(self.engine.llen(one_key(cmd, args)?)),
            "LINDEX" => self.cmd_lindex(args),
            "LRANGE" | "LTRIM" => self.cmd_list_range(cmd, args),
            "LREM" => self.cmd_lrem(args),
            "RPOPLPUSH" => {
                exactly(cmd, args, 2)?;
                Ok(self.engine.rpoplpush(&args[0], &args[1]))
            }

            // Set commands
            "SADD" => {
                let (key, members) = key_and_rest(cmd, args)?;
                Ok(self.engine.sadd(key, members))
            }
            "SREM" => {
                let (key, members) = key_and_rest(cmd, args)?;
                Ok(self.engine.srem(key, members))
            }
            "SMEMBERS" => Ok(self.engine.smembers(one_key(cmd, args)?)),
            "SCARD" => Ok(self.engine.scard(one_key(cmd, args)?)),
            "SISMEMBER" => {
                exactly(cmd, args, 2)?;
                Ok(self.engine.sismember(&args[0], &args[1]))
            }
            "SUNION" => Ok(self.engine.sunion(at_least(cmd, args, 1)?)),
            "SINTER" => Ok(self.engine.sinter(at_least(cmd, args, 1)?)),
            "SDIFF" => Ok(self.engine.sdiff(at_least(cmd, args, 1)?)),
            "SSCAN" => self.cmd_sscan(args),

            // Hash commands
            "HSET" | "HSETNX" => self.cmd_hset(cmd, args),
            "HMSET" => self.cmd_hmset(args),
            "HGET" => {
                exactly(cmd, args, 2)?;
                Ok(self.engine.hget(&args[0], &args[1]))
            }
            "HMGET" => {
                let (key, fields) = key_and_rest(cmd, args)?;
                Ok(self.engine.hmget(key, fields))
            }
            "HDEL" => {
                let (key, fields) = key_and_rest(cmd, args)?;
                Ok(self.engine.hdel(key, fields))
            }
            "HKEYS" => Ok(self.engine.hkeys(one_key(cmd, args)?)),
            "HLEN" => Ok(self.engine.hlen(one_key(cmd, args)?)),
            "HGETALL" => Ok(self.engine.hgetall(one_key(cmd, args)?)),
            "HEXISTS" => {
                exactly(cmd, args, 2)?;
                Ok(self.engine.hexists(&args[0], &args[1]))
            }
            "HINCRBY" => {
                exactly(cmd, args, 3)?;
                let increment = parse_int(&args[2])?;
                Ok(self.engine.hincrby(&args[0], &args[1], increment))
            }

            // Sorted set commands
            "ZADD" => self.cmd_zadd(args),
            "ZSCORE" => {
                exactly(cmd, args, 2)?;
                Ok(self.engine.zscore(&args[0], &args[1]))
            }
            "ZCARD" => Ok(self.engine.zcard(one_key(cmd, args)?)),
            "ZCOUNT" => {
                exactly(cmd, args, 3)?;
                self.engine.zcount(&args[0], &args[1], &args[2])
            }
            "ZINCRBY" => {
                exactly(cmd, args, 3)?;
                let increment = parse_score(&args[1])?;
                self.engine.zincrby(&args[0], increment, &args[2])
            }
            "ZRANGE" | "ZREVRANGE" => self.cmd_zrange(cmd, args),
            "ZRANGEBYSCORE" | "ZREVRANGEBYSCORE" => self.cmd_zrangebyscore(cmd, args),
            "ZRANK" => {
                exactly(cmd, args, 2)?;
                Ok(self.engine.zrank(&args[0], &args[1]))
            }
            "ZREVRANK" => {
                exactly(cmd, args, 2)?;
                Ok(self.engine.zrevrank(&args[0], &args[1]))
            }
            "ZREM" => {
                let (key, members) = key_and_rest(cmd, args)?;
                self.engine.zrem_many(key, members)
            }
            "ZREMRANGEBYSCORE" => {
                exactly(cmd, args, 3)?;
                self.engine.zremrangebyscore(&args[0], &args[1], &args[2])
            }
            "ZUNIONSTORE" => self.cmd_zunionstore(args),

            // Transactions and pipelines
            "MULTI" => {
                exactly(cmd, args, 0)?;
                Ok(self.engine.multi())
            }
            "EXEC" => {
                exactly(cmd, args, 0)?;
                Ok(self.engine.exec())
            }
            "DISCARD" => {
                exactly(cmd, args, 0)?;
                Ok(self.engine.discard())
            }
            "WATCH" => Ok(self.engine.watch(at_least(cmd, args, 1)?)),
            "UNWATCH" => Ok(self.engine.unwatch()),
            "PIPELINE" => {
                exactly(cmd, args, 0)?;
                Ok(self.engine.pipeline())
            }
            "EXECUTE" => {
                exactly(cmd, args, 0)?;
                Ok(self.engine.execute())
            }

            // Server commands
            "DBSIZE" => Ok(self.engine.dbsize()),
            "FLUSHDB" => Ok(self.engine.flushdb()),
            "SELECT" => {
                exactly(cmd, args, 1)?;
                self.engine.select_storage(&args[0]);
                Ok(Reply::ok())
            }
            "QUIT" => Ok(self.engine.quit()),
            "MONITOR" => {
                self.engine.monitor();
                Ok(Reply::ok())
            }
            "EVAL" => {
                let (script, rest) = args.split_first().ok_or_else(|| wrong_arity(cmd))?;
                Ok(self.engine.eval(script, rest))
            }
            "EVALSHA" => {
                let (sha, rest) = args.split_first().ok_or_else(|| wrong_arity(cmd))?;
                Ok(self.engine.evalsha(sha, rest))
            }
            "SETBIT" => {
                exactly(cmd, args, 3)?;
                let offset = parse_offset(&args[1])?;
                let value = match args[2].as_str() {
                    "0" => 0,
                    "1" => 1,
                    other => {
                        return Err(EmulatorError::invalid(format!(
                            "bit is not an integer or out of range: '{}'",
                            other
                        )))
                    }
                };
                self.engine.setbit(&args[0], offset, value)
            }
            "GETBIT" => {
                exactly(cmd, args, 2)?;
                let offset = parse_offset(&args[1])?;
                Ok(self.engine.getbit(&args[0], offset))
            }
            "BITCOUNT" => Ok(self.engine.bitcount(one_key(cmd, args)?)),

            _ => Err(EmulatorError::UnknownCommand(cmd.to_string())),
        }
    }

    // ========================================================================
    // Scalar commands
    // ========================================================================

    /// SET key value [NX|XX] [EX seconds|PX milliseconds]
    fn cmd_set(&mut self, args: &[String]) -> Result<Reply> {
        if args.len() < 2 {
            return Err(wrong_arity("SET"));
        }

        let mut options = SetOptions::default();
        let mut rest = args[2..].iter();
        while let Some(option) = rest.next() {
            match option.to_uppercase().as_str() {
                "NX" => options = options.only_if_absent(),
                "XX" => options = options.only_if_present(),
                "EX" => {
                    let secs = parse_int(option_value(&mut rest, "EX")?)?;
                    options = options.expire_in(positive_ttl(secs)?);
                }
                "PX" => {
                    let ms = parse_int(option_value(&mut rest, "PX")?)?;
                    options = options.expire_in_ms(positive_ttl(ms)?);
                }
                other => return Err(syntax_error(other)),
            }
        }

        if options.nx && options.xx {
            return Err(EmulatorError::invalid("NX and XX are mutually exclusive"));
        }

        Ok(self.engine.set_with(&args[0], args[1].as_str(), &options))
    }

    /// SETNX key value
    fn cmd_setnx(&mut self, args: &[String]) -> Result<Reply> {
        exactly("SETNX", args, 2)?;
        Ok(self.engine.setnx(&args[0], args[1].as_str()))
    }

    /// SETEX key seconds value
    fn cmd_setex(&mut self, args: &[String]) -> Result<Reply> {
        exactly("SETEX", args, 3)?;
        let secs = positive_ttl(parse_int(&args[1])?)?;
        Ok(self.engine.setex(&args[0], secs, args[2].as_str()))
    }

    /// MSET key value [key value ...]
    fn cmd_mset(&mut self, args: &[String]) -> Result<Reply> {
        let pairs = pairs("MSET", args)?;
        Ok(self.engine.mset(&pairs))
    }

    /// INCRBY key increment / DECRBY key decrement
    fn cmd_incrby(&mut self, cmd: &str, args: &[String]) -> Result<Reply> {
        exactly(cmd, args, 2)?;
        let step = parse_int(&args[1])?;
        Ok(if cmd == "INCRBY" {
            self.engine.incrby(&args[0], step)
        } else {
            self.engine.decrby(&args[0], step)
        })
    }

    /// INCRBYFLOAT key increment / DECRBYFLOAT key decrement
    fn cmd_incrbyfloat(&mut self, cmd: &str, args: &[String]) -> Result<Reply> {
        exactly(cmd, args, 2)?;
        let step = parse_float(&args[1])?;
        Ok(if cmd == "INCRBYFLOAT" {
            self.engine.incrbyfloat(&args[0], step)
        } else {
            self.engine.decrbyfloat(&args[0], step)
        })
    }

    // ========================================================================
    // Key commands
    // ========================================================================

    /// EXPIRE key seconds / EXPIREAT key timestamp
    fn cmd_expire(&mut self, cmd: &str, args: &[String]) -> Result<Reply> {
        exactly(cmd, args, 2)?;
        let when = parse_int(&args[1])?;
        Ok(if cmd == "EXPIRE" {
            self.engine.expire(&args[0], when)
        } else {
            self.engine.expireat(&args[0], when)
        })
    }

    /// SCAN cursor [MATCH pattern] [COUNT count]
    fn cmd_scan(&mut self, args: &[String]) -> Result<Reply> {
        let Some((cursor, rest)) = args.split_first() else {
            return Err(wrong_arity("SCAN"));
        };
        let cursor = parse_cursor(cursor)?;
        let options = scan_options(rest)?;
        Ok(self.engine.scan(cursor, &options))
    }

    // ========================================================================
    // List commands
    // ========================================================================

    /// LPUSH key value [value ...] / RPUSH key value [value ...]
    fn cmd_push(&mut self, cmd: &str, args: &[String]) -> Result<Reply> {
        let (key, values) = key_and_rest(cmd, args)?;
        if values.is_empty() {
            return Err(wrong_arity(cmd));
        }
        Ok(if cmd == "LPUSH" {
            self.engine.lpush(key, values)
        } else {
            self.engine.rpush(key, values)
        })
    }

    /// LINDEX key index
    fn cmd_lindex(&mut self, args: &[String]) -> Result<Reply> {
        exactly("LINDEX", args, 2)?;
        let index = parse_int(&args[1])?;
        Ok(self.engine.lindex(&args[0], index))
    }

    /// LRANGE key start stop / LTRIM key start stop
    fn cmd_list_range(&mut self, cmd: &str, args: &[String]) -> Result<Reply> {
        exactly(cmd, args, 3)?;
        let start = parse_int(&args[1])?;
        let stop = parse_int(&args[2])?;
        Ok(if cmd == "LRANGE" {
            self.engine.lrange(&args[0], start, stop)
        } else {
            self.engine.ltrim(&args[0], start, stop)
        })
    }

    /// LREM key count value
    fn cmd_lrem(&mut self, args: &[String]) -> Result<Reply> {
        exactly("LREM", args, 3)?;
        let count = parse_int(&args[1])?;
        Ok(self.engine.lrem(&args[0], count, &args[2]))
    }

    // ========================================================================
    // Set commands
    // ========================================================================

    /// SSCAN key cursor [MATCH pattern] [COUNT count]
    fn cmd_sscan(&mut self, args: &[String]) -> Result<Reply> {
        if args.len() < 2 {
            return Err(wrong_arity("SSCAN"));
        }
        let cursor = parse_cursor(&args[1])?;
        let options = scan_options(&args[2..])?;
        Ok(self.engine.sscan(&args[0], cursor, &options))
    }

    // ========================================================================
    // Hash commands
    // ========================================================================

    /// HSET key field value / HSETNX key field value
    fn cmd_hset(&mut self, cmd: &str, args: &[String]) -> Result<Reply> {
        exactly(cmd, args, 3)?;
        let value = args[2].as_str();
        Ok(if cmd == "HSET" {
            self.engine.hset(&args[0], &args[1], value)
        } else {
            self.engine.hsetnx(&args[0], &args[1], value)
        })
    }

    /// HMSET key field value [field value ...]
    fn cmd_hmset(&mut self, args: &[String]) -> Result<Reply> {
        let (key, rest) = key_and_rest("HMSET", args)?;
        let fields = pairs("HMSET", rest)?;
        Ok(self.engine.hmset(key, &fields))
    }

    // ========================================================================
    // Sorted set commands
    // ========================================================================

    /// ZADD key score member
    ///
    /// Several pairs parse fine but are refused by the engine.
    fn cmd_zadd(&mut self, args: &[String]) -> Result<Reply> {
        let (key, rest) = key_and_rest("ZADD", args)?;
        let raw = pairs("ZADD", rest)?;
        let pairs = raw
            .into_iter()
            .map(|(score, member)| -> Result<(f64, &str)> { Ok((parse_score(score)?, member)) })
            .collect::<Result<Vec<_>>>()?;
        self.engine.zadd_pairs(key, &pairs)
    }

    /// ZRANGE key start stop [WITHSCORES] / ZREVRANGE ...
    fn cmd_zrange(&mut self, cmd: &str, args: &[String]) -> Result<Reply> {
        let with_scores = match args.len() {
            3 => false,
            4 if args[3].eq_ignore_ascii_case("WITHSCORES") => true,
            4 => return Err(syntax_error(&args[3])),
            _ => return Err(wrong_arity(cmd)),
        };
        let start = parse_int(&args[1])?;
        let stop = parse_int(&args[2])?;
        Ok(if cmd == "ZRANGE" {
            self.engine.zrange(&args[0], start, stop, with_scores)
        } else {
            self.engine.zrevrange(&args[0], start, stop, with_scores)
        })
    }

    /// ZRANGEBYSCORE key min max [WITHSCORES] [LIMIT offset count]
    ///
    /// `ZREVRANGEBYSCORE` takes `max` before `min`.
    fn cmd_zrangebyscore(&mut self, cmd: &str, args: &[String]) -> Result<Reply> {
        if args.len() < 3 {
            return Err(wrong_arity(cmd));
        }

        let mut options = RangeOptions::default();
        let mut rest = args[3..].iter();
        while let Some(option) = rest.next() {
            match option.to_uppercase().as_str() {
                "WITHSCORES" => options = options.with_scores(),
                "LIMIT" => {
                    let offset = parse_count(option_value(&mut rest, "LIMIT")?)?;
                    let count = parse_count(option_value(&mut rest, "LIMIT")?)?;
                    options = options.limit(offset, count);
                }
                other => return Err(syntax_error(other)),
            }
        }

        if cmd == "ZRANGEBYSCORE" {
            self.engine.zrangebyscore(&args[0], &args[1], &args[2], &options)
        } else {
            self.engine.zrevrangebyscore(&args[0], &args[1], &args[2], &options)
        }
    }

    /// ZUNIONSTORE destination numkeys key [key ...] [WEIGHTS weight ...] [AGGREGATE SUM|MIN|MAX]
    fn cmd_zunionstore(&mut self, args: &[String]) -> Result<Reply> {
        if args.len() < 3 {
            return Err(wrong_arity("ZUNIONSTORE"));
        }
        let destination = &args[0];
        let numkeys = parse_count(&args[1])?;
        if numkeys == 0 || numkeys > args.len() - 2 {
            return Err(EmulatorError::invalid(
                "numkeys must be positive and match the keys given",
            ));
        }
        let keys = &args[2..2 + numkeys];

        let mut options = UnionOptions::default();
        let mut rest = args[2 + numkeys..].iter();
        while let Some(option) = rest.next() {
            match option.to_uppercase().as_str() {
                "WEIGHTS" => {
                    let weights = (0..numkeys)
                        .map(|_| option_value(&mut rest, "WEIGHTS").and_then(parse_float))
                        .collect::<Result<Vec<f64>>>()?;
                    options = options.weights(weights);
                }
                "AGGREGATE" => {
                    let aggregate: Aggregate = option_value(&mut rest, "AGGREGATE")?.parse()?;
                    options = options.aggregate(aggregate);
                }
                other => return Err(syntax_error(other)),
            }
        }

        self.engine.zunionstore(destination, keys, &options)
    }
}

// ============================================================================
// Argument helpers
// ============================================================================

fn wrong_arity(cmd: &str) -> EmulatorError {
    EmulatorError::WrongArity(cmd.to_string())
}

fn syntax_error(token: &str) -> EmulatorError {
    EmulatorError::invalid(format!("syntax error near '{}'", token))
}

fn exactly(cmd: &str, args: &[String], count: usize) -> Result<()> {
    if args.len() == count {
        Ok(())
    } else {
        Err(wrong_arity(cmd))
    }
}

fn at_least<'a>(cmd: &str, args: &'a [String], count: usize) -> Result<&'a [String]> {
    if args.len() >= count {
        Ok(args)
    } else {
        Err(wrong_arity(cmd))
    }
}

fn one_key<'a>(cmd: &str, args: &'a [String]) -> Result<&'a str> {
    match args {
        [key] => Ok(key.as_str()),
        _ => Err(wrong_arity(cmd)),
    }
}

/// Splits `key rest...`, requiring at least one more argument after the key.
fn key_and_rest<'a>(cmd: &str, args: &'a [String]) -> Result<(&'a str, &'a [String])> {
    match args {
        [key, rest @ ..] if !rest.is_empty() => Ok((key.as_str(), rest)),
        _ => Err(wrong_arity(cmd)),
    }
}

/// Groups `a b c d` into `[(a, b), (c, d)]`.
fn pairs<'a>(cmd: &str, args: &'a [String]) -> Result<Vec<(&'a str, &'a str)>> {
    if args.is_empty() || args.len() % 2 != 0 {
        return Err(wrong_arity(cmd));
    }
    Ok(args
        .chunks_exact(2)
        .map(|pair| (pair[0].as_str(), pair[1].as_str()))
        .collect())
}

/// The value following an option word.
fn option_value<'a>(
    rest: &mut impl Iterator<Item = &'a String>,
    option: &str,
) -> Result<&'a str> {
    rest.next()
        .map(String::as_str)
        .ok_or_else(|| EmulatorError::invalid(format!("{} needs a value", option)))
}

fn scan_options(args: &[String]) -> Result<ScanOptions> {
    let mut options = ScanOptions::default();
    let mut rest = args.iter();
    while let Some(option) = rest.next() {
        match option.to_uppercase().as_str() {
            "MATCH" => options = options.matching(option_value(&mut rest, "MATCH")?),
            "COUNT" => {
                let count = parse_count(option_value(&mut rest, "COUNT")?)?;
                if count == 0 {
                    return Err(EmulatorError::invalid("COUNT must be positive"));
                }
                options = options.with_count(count);
            }
            other => return Err(syntax_error(other)),
        }
    }
    Ok(options)
}

fn parse_int(value: &str) -> Result<i64> {
    value
        .parse()
        .map_err(|_| EmulatorError::invalid(format!("value is not an integer: '{}'", value)))
}

fn parse_float(value: &str) -> Result<f64> {
    value
        .parse::<f64>()
        .ok()
        .filter(|n| !n.is_nan())
        .ok_or_else(|| EmulatorError::invalid(format!("value is not a valid float: '{}'", value)))
}

fn parse_count(value: &str) -> Result<usize> {
    value
        .parse()
        .map_err(|_| EmulatorError::invalid(format!("value is not a count: '{}'", value)))
}

fn parse_cursor(value: &str) -> Result<u64> {
    value
        .parse()
        .map_err(|_| EmulatorError::invalid(format!("invalid cursor '{}'", value)))
}

fn parse_offset(value: &str) -> Result<u64> {
    value
        .parse()
        .map_err(|_| EmulatorError::invalid(format!("bit offset is not an integer: '{}'", value)))
}

fn positive_ttl(value: i64) -> Result<i64> {
    if value > 0 {
        Ok(value)
    } else {
        Err(EmulatorError::invalid("invalid expire time"))
    }
}
