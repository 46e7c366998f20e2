//! Balance and product commands

use async_trait::async_trait;

use super::CommandContext;
use crate::application::errors::CommandError;
use crate::application::stores::format_money;
use crate::domain::entities::{user_jid, Outbound};
use crate::domain::traits::{CommandHandler, CommandResult};

fn product_not_found(ctx: &CommandContext<'_>) -> CommandError {
    CommandError::NotFound(ctx.messages().product_not_found.clone())
}

fn insufficient_balance(ctx: &CommandContext<'_>) -> CommandError {
    CommandError::InsufficientResource(ctx.messages().insufficient_balance.clone())
}

pub struct CheckMoney;

#[async_trait]
impl CommandHandler for CheckMoney {
    async fn execute(&self, ctx: &CommandContext<'_>) -> CommandResult {
        let balance = ctx.bot.stores.commerce.get_balance(ctx.sender());
        Ok(vec![ctx.reply(format!("*SALDO ANDA*\n\nSaldo: {}", format_money(balance)))])
    }
}

pub struct ListProducts;

#[async_trait]
impl CommandHandler for ListProducts {
    async fn execute(&self, ctx: &CommandContext<'_>) -> CommandResult {
        let products = ctx.bot.stores.commerce.get_all_products();
        if products.is_empty() {
            return Ok(vec![ctx.reply("Belum ada produk.")]);
        }

        let mut text = String::from("*DAFTAR PRODUK*\n");
        for product in &products {
            text.push_str(&format!(
                "\nKode: {}\nNama: {}\nHarga: {}\n",
                product.code,
                product.name,
                format_money(product.price)
            ));
        }
        text.push_str(&format!("\nBeli dengan: {}buyproduk <kode>", ctx.prefix()));
        Ok(vec![ctx.reply(text)])
    }
}

/// Debit the buyer and notify the owner
pub struct BuyProduct;

#[async_trait]
impl CommandHandler for BuyProduct {
    async fn execute(&self, ctx: &CommandContext<'_>) -> CommandResult {
        let code = ctx.command.arg(0).ok_or_else(|| ctx.usage())?;
        let commerce = &ctx.bot.stores.commerce;
        let product = commerce.get_product(code).ok_or_else(|| product_not_found(ctx))?;

        let buyer = ctx.sender();
        if commerce.get_balance(buyer) < product.price {
            return Err(insufficient_balance(ctx));
        }
        // The balance may have moved since the check above
        let remaining = commerce
            .reduce_balance(buyer, product.price)
            .map_err(|_| insufficient_balance(ctx))?;

        tracing::info!(
            "{} bought {} ({}) for {}",
            buyer,
            product.code,
            product.name,
            product.price
        );

        let receipt = ctx.reply(format!(
            "{}\n\nProduk: {}\nHarga: {}\nSisa saldo: {}",
            ctx.messages().purchase_success,
            product.name,
            format_money(product.price),
            format_money(remaining)
        ));
        let handle = buyer.split('@').next().unwrap_or(buyer);
        let notice = Outbound::text(
            ctx.policy.owner_jid(),
            format!(
                "*PESANAN BARU*\n\nPembeli: @{}\nProduk: {} ({})\nHarga: {}",
                handle,
                product.name,
                product.code,
                format_money(product.price)
            ),
        )
        .mentioning(buyer);

        Ok(vec![receipt, notice])
    }
}

pub struct Deposit;

#[async_trait]
impl CommandHandler for Deposit {
    async fn execute(&self, ctx: &CommandContext<'_>) -> CommandResult {
        let store = &ctx.bot.config.store;
        let qris = Outbound::image(
            ctx.message.chat_id.clone(),
            store.qris_image.clone(),
            "*DEPOSIT SALDO*\n\nScan QRIS di atas untuk melakukan deposit.",
        )
        .quoting(ctx.message);

        let mut text = String::from("*CARA DEPOSIT*\n");
        for step in &store.payment_instructions {
            text.push('\n');
            text.push_str(step);
        }
        Ok(vec![qris, ctx.reply(text)])
    }
}

/// Forward a deposit confirmation to the owner
pub struct SendProof;

#[async_trait]
impl CommandHandler for SendProof {
    async fn execute(&self, ctx: &CommandContext<'_>) -> CommandResult {
        let sender = ctx.sender();
        let handle = sender.split('@').next().unwrap_or(sender);
        let mut text = format!(
            "*BUKTI DEPOSIT*\n\nDari: @{} ({})",
            handle,
            ctx.message.sender_name()
        );
        let note = ctx.command.query();
        if !note.is_empty() {
            text.push_str(&format!("\nCatatan: {}", note));
        }
        text.push_str(&format!(
            "\n\nTambahkan saldo dengan {}addmoney {} <jumlah>",
            ctx.prefix(),
            handle
        ));

        let notice = Outbound::text(ctx.policy.owner_jid(), text).mentioning(sender);
        Ok(vec![notice, ctx.reply(ctx.messages().deposit_success.clone())])
    }
}

pub struct AddMoney;

#[async_trait]
impl CommandHandler for AddMoney {
    async fn execute(&self, ctx: &CommandContext<'_>) -> CommandResult {
        ctx.require_owner()?;
        let target = ctx.command.arg(0).and_then(user_jid).ok_or_else(|| ctx.usage())?;
        let amount = ctx.positive_arg(1)?;

        let balance = ctx.bot.stores.commerce.add_balance(&target, amount);
        tracing::info!("Credited {} to {}, balance {}", amount, target, balance);

        let handle = target.split('@').next().unwrap_or(&target).to_string();
        let reply = ctx
            .reply(format!(
                "Berhasil menambahkan {} ke @{}\nSaldo sekarang: {}",
                format_money(amount),
                handle,
                format_money(balance)
            ))
            .mentioning(target);
        Ok(vec![reply])
    }
}

pub struct AddProduct;

#[async_trait]
impl CommandHandler for AddProduct {
    async fn execute(&self, ctx: &CommandContext<'_>) -> CommandResult {
        ctx.require_owner()?;
        let args = &ctx.command.args;
        if args.len() < 2 {
            return Err(ctx.usage());
        }
        let price = ctx.positive_arg(args.len() - 1)?;
        let name = args[..args.len() - 1].join(" ");

        let product = ctx.bot.stores.commerce.add_product(&name, price)?;
        tracing::info!("Added product {} ({})", product.code, product.name);
        Ok(vec![ctx.reply(format!(
            "Produk berhasil ditambahkan!\n\nKode: {}\nNama: {}\nHarga: {}",
            product.code,
            product.name,
            format_money(product.price)
        ))])
    }
}

pub struct DeleteProduct;

#[async_trait]
impl CommandHandler for DeleteProduct {
    async fn execute(&self, ctx: &CommandContext<'_>) -> CommandResult {
        ctx.require_owner()?;
        let code = ctx.command.arg(0).ok_or_else(|| ctx.usage())?;
        if !ctx.bot.stores.commerce.delete_product(code) {
            return Err(product_not_found(ctx));
        }
        Ok(vec![ctx.reply(format!(
            "Produk {} berhasil dihapus.",
            code.to_uppercase()
        ))])
    }
}
