use inkforge::{Book, ParseOptions, Result, UnsupportedPolicy};
use clap::Parser;
use std::process::ExitCode;

/// 📚 inkforge - 文档解析工具
#[derive(Parser)]
#[command(name = "inkforge")]
#[command(about = "把TXT、EPUB等文档解析为书籍并显示其内容")]
#[command(version)]
struct Args {
    /// 文档路径
    #[arg(help = "要解析的文档路径", required_unless_present = "generate_config")]
    file: Option<String>,

    /// 配置文件路径
    #[arg(short, long, help = "YAML格式的解析选项文件")]
    config: Option<String>,

    /// 详细输出模式
    #[arg(short, long, help = "输出调试日志")]
    verbose: bool,

    /// 显示指定章节内容
    #[arg(long, help = "显示指定章节的内容（使用章节索引，从1开始）")]
    chapter: Option<usize>,

    /// 章节内容显示格式
    #[arg(long, value_enum, default_value = "text", help = "章节内容的显示格式")]
    format: ContentFormat,

    /// 章节内容最大显示长度
    #[arg(long, default_value = "2000", help = "章节内容最大显示字符数（0表示不限制）")]
    max_length: usize,

    /// 以YAML输出整本书
    #[arg(long, help = "以YAML格式输出整本书")]
    yaml: bool,

    /// 拒绝不支持的格式
    #[arg(long, help = "遇到不支持的格式时报错而不是生成占位书籍")]
    reject_unsupported: bool,

    /// 生成默认配置文件
    #[arg(long, value_name = "PATH", help = "把默认解析选项写入指定文件")]
    generate_config: Option<String>,
}

/// 章节内容显示格式
#[derive(clap::ValueEnum, Clone, Debug)]
enum ContentFormat {
    /// 纯文本格式
    Text,
    /// 原始标记
    Markup,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("❌ 错误: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    if let Some(path) = &args.generate_config {
        ParseOptions::generate_default_config(path)?;
        println!("✅ 已生成配置文件: {}", path);
        if args.file.is_none() {
            return Ok(());
        }
    }

    let mut options = match &args.config {
        Some(path) => ParseOptions::from_file(path)?,
        None => ParseOptions::default(),
    };
    if args.reject_unsupported {
        options.unsupported = UnsupportedPolicy::Reject;
    }

    let Some(file) = &args.file else {
        return Ok(());
    };
    let book = inkforge::parse_with_options(file, &options)?;

    if args.yaml {
        let yaml = serde_yml::to_string(&book)
            .map_err(|e| inkforge::ParseError::Config(format!("序列化书籍失败: {}", e)))?;
        print!("{}", yaml);
        return Ok(());
    }

    print_summary(&book);

    if let Some(index) = args.chapter {
        print_chapter(&book, index, &args.format, args.max_length);
    }

    Ok(())
}

fn print_summary(book: &Book) {
    println!("\n📖 书籍信息:");
    println!("  书名: {}", book.title());
    println!("  作者: {}", book.author());
    println!("  格式: {:?}", book.format());
    println!("  章节数: {}", book.chapters().len());

    println!("\n📋 章节列表:");
    for (i, chapter) in book.chapters().iter().enumerate() {
        println!(
            "  {}. {} ({} 字符)",
            i + 1,
            chapter.title(),
            chapter.plain_text().chars().count()
        );
    }
}

fn print_chapter(book: &Book, index: usize, format: &ContentFormat, max_length: usize) {
    let Some(chapter) = index.checked_sub(1).and_then(|i| book.chapters().get(i)) else {
        println!(
            "\n❌ 章节索引 {} 超出范围 (1-{})",
            index,
            book.chapters().len()
        );
        return;
    };

    let content = match format {
        ContentFormat::Text => chapter.plain_text(),
        ContentFormat::Markup => chapter.markup(),
    };
    let total = content.chars().count();

    println!("\n📝 第 {} 章: {}", index, chapter.title());
    println!("{}", "━".repeat(40));
    if max_length > 0 && total > max_length {
        let truncated: String = content.chars().take(max_length).collect();
        println!("{}", truncated);
        println!("{}", "━".repeat(40));
        println!(
            "  💡 提示: 还有 {} 个字符未显示。使用 --max-length 0 显示完整内容。",
            total - max_length
        );
    } else {
        println!("{}", content);
        println!("{}", "━".repeat(40));
    }
}
